use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::prelude::{
    Epoch, Ephemeris, EphemerisSource, EphemerisStore, Error, Frame, Orbit, OrbitSource,
    SatelliteState, SV,
};

/// [SharedEphemerisStore] shares one [EphemerisStore] between threads,
/// typically one thread ingesting [Ephemeris] and others resolving states.
/// Clones point to the same store.
#[derive(Debug, Clone)]
pub struct SharedEphemerisStore {
    inner: Arc<RwLock<EphemerisStore>>,
}

impl From<EphemerisStore> for SharedEphemerisStore {
    fn from(store: EphemerisStore) -> Self {
        Self::new(store)
    }
}

impl SharedEphemerisStore {
    /// Wraps this [EphemerisStore]
    pub fn new(store: EphemerisStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Read access to the store
    pub fn read(&self) -> Result<RwLockReadGuard<'_, EphemerisStore>, Error> {
        self.inner.read().map_err(|_| Error::PoisonedLock)
    }

    /// Exclusive access to the store
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, EphemerisStore>, Error> {
        self.inner.write().map_err(|_| Error::PoisonedLock)
    }

    /// See [EphemerisStore::add_ephemeris]
    pub fn add_ephemeris(&self, ephemeris: Ephemeris) -> Result<bool, Error> {
        self.write()?.add_ephemeris(ephemeris)
    }

    /// See [EphemerisStore::find_ephemeris]
    pub fn find_ephemeris(&self, sv: SV, t: Epoch) -> Result<Ephemeris, Error> {
        self.read()?.find_ephemeris(sv, t).copied()
    }

    /// See [EphemerisStore::xvt]
    pub fn xvt(&self, sv: SV, t: Epoch) -> Result<SatelliteState, Error> {
        self.read()?.xvt(sv, t)
    }
}

impl EphemerisSource for SharedEphemerisStore {
    fn ephemeris_data(&self, epoch: Epoch, sv: SV) -> Option<Ephemeris> {
        self.find_ephemeris(sv, epoch).ok()
    }
}

impl OrbitSource for SharedEphemerisStore {
    fn state_at(&self, epoch: Epoch, sv: SV, fr: Frame) -> Option<Orbit> {
        let state = self.xvt(sv, epoch).ok()?;
        Some(state.to_orbit(fr))
    }
}
