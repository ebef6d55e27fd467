//! Broadcast ephemeris store
use itertools::Itertools;
use log::{debug, error};

use std::collections::{BTreeMap, HashMap};

use crate::{
    ephemeris::keplerian_timescale,
    prelude::{
        Config, Constellation, Epoch, Ephemeris, EphemerisSource, Error, Frame, Orbit,
        OrbitSource, SatelliteState, SearchMethod, TimeScale, SV,
    },
};

mod search;
mod shared;

pub use shared::SharedEphemerisStore;

/// [EphemerisStore] collects broadcast [Ephemeris] of a single [Constellation].
/// For each [SV], [Ephemeris] are indexed by the start of their fit interval
/// (ToE - fit/2). For one [SV] and one index, only the latest transmitted
/// [Ephemeris] is retained.
#[derive(Debug, Clone)]
pub struct EphemerisStore {
    /// [Constellation] this store is dedicated to
    constellation: Constellation,
    /// [Constellation] system time
    timescale: TimeScale,
    /// [Config] preset
    cfg: Config,
    /// Earliest fit interval start, across all satellites
    initial_time: Option<Epoch>,
    /// Latest fit interval end, across all satellites
    final_time: Option<Epoch>,
    /// [Ephemeris] indexed by fit interval start
    ephemerides: HashMap<SV, BTreeMap<Epoch, Ephemeris>>,
}

impl std::fmt::Display for EphemerisStore {
    /// Summary of this store. The alternate form lists every [Ephemeris].
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} ephemeris store ({} search): {} entries",
            self.constellation,
            self.cfg.method,
            self.len()
        )?;
        match (self.initial_time, self.final_time) {
            (Some(initial), Some(t_final)) => write!(f, " from {} to {}", initial, t_final)?,
            _ => write!(f, " (empty span)")?,
        }
        if f.alternate() {
            for (sv, entries) in self.ephemerides.iter().sorted_by_key(|(sv, _)| **sv) {
                for (key, ephemeris) in entries.iter() {
                    write!(f, "\n{} - KEY {} - {}", sv, key, ephemeris)?;
                }
            }
        }
        Ok(())
    }
}

impl EphemerisStore {
    /// Creates a new [EphemerisStore] dedicated to this [Constellation],
    /// using default [Config]. Fails if the [Constellation] does
    /// not broadcast Keplerian ephemerides.
    pub fn new(constellation: Constellation) -> Result<Self, Error> {
        Self::with_config(constellation, Config::default())
    }

    /// Creates a new [EphemerisStore] dedicated to this [Constellation],
    /// with desired [Config].
    pub fn with_config(constellation: Constellation, cfg: Config) -> Result<Self, Error> {
        let timescale = keplerian_timescale(constellation)?;
        debug!("{} ephemeris store ({}) - {:?}", constellation, timescale, cfg);
        Ok(Self {
            constellation,
            timescale,
            cfg,
            initial_time: None,
            final_time: None,
            ephemerides: HashMap::with_capacity(32),
        })
    }

    /// [Constellation] this store is dedicated to
    pub fn constellation(&self) -> Constellation {
        self.constellation
    }

    /// [TimeScale] of the stored [Ephemeris]
    pub fn timescale(&self) -> TimeScale {
        self.timescale
    }

    /// Current [Config]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Earliest [Epoch] covered by this store, None while empty
    pub fn initial_time(&self) -> Option<Epoch> {
        self.initial_time
    }

    /// Latest [Epoch] covered by this store, None while empty
    pub fn final_time(&self) -> Option<Epoch> {
        self.final_time
    }

    /// Current [SearchMethod]
    pub fn search_method(&self) -> SearchMethod {
        self.cfg.method
    }

    /// Selects [SearchMethod] used by [Self::find_ephemeris] and [Self::xvt]
    pub fn set_search_method(&mut self, method: SearchMethod) {
        self.cfg.method = method;
    }

    /// Switches to [SearchMethod::Near]
    pub fn search_near(&mut self) {
        self.set_search_method(SearchMethod::Near);
    }

    /// Switches to [SearchMethod::User] (default)
    pub fn search_past(&mut self) {
        self.set_search_method(SearchMethod::User);
    }

    pub(crate) fn check_constellation(&self, sv: SV) -> Result<(), Error> {
        if sv.constellation == self.constellation {
            Ok(())
        } else {
            Err(Error::WrongConstellation(sv, self.constellation))
        }
    }

    /// Adds this [Ephemeris] to the store.
    /// If an [Ephemeris] already exists for this [SV] and fit interval,
    /// it is replaced only when the new one was transmitted strictly later.
    /// Returns true if the store was modified.
    pub fn add_ephemeris(&mut self, ephemeris: Ephemeris) -> Result<bool, Error> {
        let sv = ephemeris.sv;
        self.check_constellation(sv)?;

        let (key, fit, tot) = match (
            ephemeris.fit_interval_start(),
            ephemeris.fit_interval(),
            ephemeris.transmission_time(),
        ) {
            (Ok(key), Ok(fit), Ok(tot)) => (key, fit, tot),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                error!("{} - rejected incomplete ephemeris: {}", sv, e);
                return Err(e);
            },
        };

        if let Some(incumbent) = self.ephemerides.get(&sv).and_then(|map| map.get(&key)) {
            let incumbent_tot = incumbent.transmission_time()?;
            if tot <= incumbent_tot {
                debug!(
                    "{}({}) - discarded: not newer than {}",
                    key, sv, incumbent_tot
                );
                return Ok(false);
            }
            debug!("{}({}) - replacing ephemeris from {}", key, sv, incumbent_tot);
        }

        self.ephemerides.entry(sv).or_default().insert(key, ephemeris);

        let end = key + fit;

        self.initial_time = Some(match self.initial_time {
            Some(initial) => initial.min(key),
            None => key,
        });

        self.final_time = Some(match self.final_time {
            Some(t_final) => t_final.max(end),
            None => end,
        });

        debug!("{}({}) - new ephemeris (tot={}) valid until {}", key, sv, tot, end);
        Ok(true)
    }

    /// Erases every [Ephemeris] whose fit interval starts before `t_min`
    /// or after `t_max`. Store bounds are then set to exactly
    /// [t_min, t_max], whatever remains in the store.
    pub fn edit(&mut self, t_min: Epoch, t_max: Epoch) {
        for entries in self.ephemerides.values_mut() {
            entries.retain(|key, _| *key >= t_min && *key <= t_max);
        }
        self.ephemerides.retain(|_, entries| !entries.is_empty());
        self.initial_time = Some(t_min);
        self.final_time = Some(t_max);
        debug!("store edited: {} entries within [{}, {}]", self.len(), t_min, t_max);
    }

    /// Erases every [Ephemeris] whose fit interval starts before `t`.
    /// The lower bound becomes `t`, the upper bound is preserved.
    pub fn wiper(&mut self, t: Epoch) {
        for entries in self.ephemerides.values_mut() {
            entries.retain(|key, _| *key >= t);
        }
        self.ephemerides.retain(|_, entries| !entries.is_empty());
        self.initial_time = Some(t);
        debug!("store wiped until {}: {} remaining entries", t, self.len());
    }

    /// Removes everything. Bounds return to their unset state.
    pub fn clear(&mut self) {
        self.ephemerides.clear();
        self.initial_time = None;
        self.final_time = None;
    }

    /// Total number of [Ephemeris], across all satellites
    pub fn len(&self) -> usize {
        self.ephemerides.values().map(|entries| entries.len()).sum()
    }

    /// True if this store contains no [Ephemeris]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if at least one [Ephemeris] exists for this [SV]
    pub fn is_present(&self, sv: SV) -> bool {
        self.ephemerides.contains_key(&sv)
    }

    /// Returns all [Ephemeris] of this [SV], indexed by fit interval start.
    pub fn ephemerides(&self, sv: SV) -> Option<&BTreeMap<Epoch, Ephemeris>> {
        self.ephemerides.get(&sv)
    }

    /// Iterates over every [Ephemeris], by [SV] then in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Ephemeris> + '_ {
        self.ephemerides
            .iter()
            .sorted_by_key(|(sv, _)| **sv)
            .flat_map(|(_, entries)| entries.values())
    }

    /// Returns health bits of this [SV] at `t`,
    /// from the [SearchMethod::User] selection.
    pub fn sat_health(&self, sv: SV, t: Epoch) -> Result<u16, Error> {
        self.find_user_ephemeris(sv, t)?.health()
    }

    /// Resolves [SatelliteState] of this [SV] at `t`, using the
    /// [Ephemeris] the current [SearchMethod] selects.
    pub fn xvt(&self, sv: SV, t: Epoch) -> Result<SatelliteState, Error> {
        self.find_ephemeris(sv, t)?
            .propagate_with_solver(t, &self.cfg.solver)
    }

    /// Same as [Self::xvt], also returns the IODC of the [Ephemeris] that was used.
    pub fn xvt_iodc(&self, sv: SV, t: Epoch) -> Result<(SatelliteState, u16), Error> {
        let ephemeris = self.find_ephemeris(sv, t)?;
        let state = ephemeris.propagate_with_solver(t, &self.cfg.solver)?;
        Ok((state, ephemeris.iodc()?))
    }
}

impl EphemerisSource for EphemerisStore {
    fn ephemeris_data(&self, epoch: Epoch, sv: SV) -> Option<Ephemeris> {
        self.find_ephemeris(sv, epoch).ok().copied()
    }
}

impl OrbitSource for EphemerisStore {
    fn state_at(&self, epoch: Epoch, sv: SV, fr: Frame) -> Option<Orbit> {
        let state = self.xvt(sv, epoch).ok()?;
        Some(state.to_orbit(fr))
    }
}
