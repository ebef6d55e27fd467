use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::KeplerSolver;

mod method;

pub use method::SearchMethod;

/// Configuration Error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown search method \"{0}\"")]
    UnknownSearchMethod(String),
}

fn default_search_method() -> SearchMethod {
    SearchMethod::User
}

fn default_kepler_solver() -> KeplerSolver {
    KeplerSolver::default()
}

/// [EphemerisStore](crate::prelude::EphemerisStore) configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Selection method used by
    /// [EphemerisStore::find_ephemeris](crate::prelude::EphemerisStore::find_ephemeris)
    #[cfg_attr(feature = "serde", serde(default = "default_search_method"))]
    pub method: SearchMethod,
    /// [KeplerSolver] used to resolve satellite states
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_solver"))]
    pub solver: KeplerSolver,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: default_search_method(),
            solver: default_kepler_solver(),
        }
    }
}

impl Config {
    /// Returns [Config] preset for this [SearchMethod]
    pub fn preset(method: SearchMethod) -> Self {
        let mut s = Self::default();
        s.method = method;
        s
    }

    /// Copies and returns [Config] with updated [SearchMethod]
    pub fn with_search_method(&self, method: SearchMethod) -> Self {
        let mut s = *self;
        s.method = method;
        s
    }

    /// Copies and returns [Config] with updated [KeplerSolver]
    pub fn with_kepler_solver(&self, solver: KeplerSolver) -> Self {
        let mut s = *self;
        s.solver = solver;
        s
    }
}
