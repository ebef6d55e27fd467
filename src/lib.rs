#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod cfg;
mod constants;
mod ellipsoid;
mod ephemeris;
mod error;
mod orbit;
mod store;
mod time;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, Error as ConfigError, SearchMethod};
    pub use crate::ellipsoid::Ellipsoid;
    pub use crate::ephemeris::{
        ura::{accuracy_to_ura, ura_to_accuracy},
        ClockSubframe, EccentricAnomaly, Ephemeris, EphemerisSource, Kepler, KeplerSolver,
        OrbitSubframe, OrientationSubframe, Perturbations,
    };
    pub use crate::error::Error;
    pub use crate::orbit::{OrbitSource, SatelliteState};
    pub use crate::store::{EphemerisStore, SharedEphemerisStore};
    pub use crate::time::WeekSecond;
    // re-export
    pub use anise::prelude::{Frame, Orbit};
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
    pub use nalgebra::Vector3;
}
