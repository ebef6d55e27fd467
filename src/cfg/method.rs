use crate::cfg::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ephemeris selection method
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchMethod {
    /// Strict (user) selection, as a receiver would have done in real time:
    /// the ephemeris must have been transmitted before the requested
    /// instant, and its fit interval must contain it.
    /// Among several candidates, the latest transmitted wins.
    #[default]
    User,

    /// Near selection, for post-processing: the fit interval must contain
    /// the requested instant, but the ephemeris may have been transmitted
    /// after it. Among several candidates, the one transmitted
    /// closest to the requested instant wins.
    Near,
}

impl std::fmt::Display for SearchMethod {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::User => write!(fmt, "User"),
            Self::Near => write!(fmt, "Near"),
        }
    }
}

impl std::str::FromStr for SearchMethod {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "strict" | "past" => Ok(Self::User),
            "near" | "nearest" => Ok(Self::Near),
            _ => Err(Error::UnknownSearchMethod(s.to_string())),
        }
    }
}
