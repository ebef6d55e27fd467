use log::debug;

use crate::{
    constants::DEFAULT_FIT_INTERVAL_HOURS,
    prelude::{Duration, Epoch, Ephemeris, EphemerisStore, Error, SearchMethod, SV},
};

impl EphemerisStore {
    /// Candidates for `t`: scan starts one step before the first fit interval
    /// start at or after t - 4h (or at the first one), stops at the first one after `t`.
    fn candidates(
        &self,
        sv: SV,
        t: Epoch,
    ) -> Result<impl Iterator<Item = (&Epoch, &Ephemeris)> + '_, Error> {
        self.check_constellation(sv)?;

        let entries = self
            .ephemerides(sv)
            .ok_or(Error::NoApplicableEphemeris(sv, t))?;

        let lookback = t - Duration::from_seconds(DEFAULT_FIT_INTERVAL_HOURS * 3600.0);

        let start = entries
            .range(..lookback)
            .next_back()
            .or_else(|| entries.iter().next())
            .map(|(key, _)| *key)
            .ok_or(Error::NoApplicableEphemeris(sv, t))?;

        Ok(entries
            .range(start..)
            .take_while(move |(key, _)| **key <= t))
    }

    /// Selects the [Ephemeris] a receiver would have used at `t`:
    /// `t` lies within [start, start + fit[ and the [Ephemeris]
    /// was transmitted before `t`. Latest transmission wins.
    pub fn find_user_ephemeris(&self, sv: SV, t: Epoch) -> Result<&Ephemeris, Error> {
        let mut best: Option<(&Ephemeris, Epoch)> = None;

        for (start, ephemeris) in self.candidates(sv, t)? {
            let dt = t - *start;
            if dt < Duration::ZERO || dt >= ephemeris.fit_interval()? {
                continue;
            }

            let tot = ephemeris.transmission_time()?;
            if tot > t {
                continue;
            }

            match best {
                Some((_, best_tot)) if tot <= best_tot => {},
                _ => best = Some((ephemeris, tot)),
            }
        }

        let (ephemeris, tot) = best.ok_or(Error::NoApplicableEphemeris(sv, t))?;
        debug!("{}({}) - user selection: transmitted {}", t, sv, tot);
        Ok(ephemeris)
    }

    /// Selects the [Ephemeris] transmitted nearest to `t`, among those
    /// whose fit interval [start, start + fit] contains `t`.
    /// Transmission may have happened after `t`.
    pub fn find_near_ephemeris(&self, sv: SV, t: Epoch) -> Result<&Ephemeris, Error> {
        let mut best: Option<(&Ephemeris, Duration)> = None;

        for (start, ephemeris) in self.candidates(sv, t)? {
            let dt = t - *start;
            if dt < Duration::ZERO || dt > ephemeris.fit_interval()? {
                continue;
            }

            let distance = (t - ephemeris.transmission_time()?).abs();

            match best {
                Some((_, best_distance)) if distance >= best_distance => {},
                _ => best = Some((ephemeris, distance)),
            }
        }

        let (ephemeris, distance) = best.ok_or(Error::NoApplicableEphemeris(sv, t))?;
        debug!("{}({}) - near selection: |dt|={}", t, sv, distance);
        Ok(ephemeris)
    }

    /// Selects [Ephemeris] for this [SV] at `t`, with current [SearchMethod].
    pub fn find_ephemeris(&self, sv: SV, t: Epoch) -> Result<&Ephemeris, Error> {
        match self.cfg.method {
            SearchMethod::User => self.find_user_ephemeris(sv, t),
            SearchMethod::Near => self.find_near_ephemeris(sv, t),
        }
    }
}
