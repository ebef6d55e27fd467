use thiserror::Error;

use crate::prelude::{Constellation, Epoch, SV};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Either this [SV] is unknown to the store, or none of its
    /// [Ephemeris](crate::prelude::Ephemeris) is valid at this [Epoch],
    /// with respect to the active search method.
    /// Ingesting more data and retrying may resolve this.
    #[error("no applicable ephemeris for {0} at {1}")]
    NoApplicableEphemeris(SV, Epoch),

    /// Store is dedicated to a single [Constellation] and
    /// this [SV] belongs to another one.
    #[error("{0} does not belong to {1} store")]
    WrongConstellation(SV, Constellation),

    /// The message block owning this field was never supplied.
    #[error("{0}: field \"{1}\" not loaded yet")]
    FieldNotLoaded(SV, &'static str),

    /// Broadcast model of this [Constellation] is not Keplerian
    /// (Glonass, augmentation systems) or its timescale is not supported.
    #[error("{0} does not broadcast keplerian ephemerides")]
    NonKeplerianConstellation(Constellation),

    /// A thread panicked while holding the shared store.
    #[error("shared ephemeris store is poisoned")]
    PoisonedLock,
}
