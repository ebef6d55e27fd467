use rand::{rngs::SmallRng, Rng};

use crate::{
    prelude::{Epoch, Ephemeris, SV},
    tests::TestEphemeris,
};

mod bounds;
mod selection;

/// Generates `size` random [TestEphemeris] for this [SV], with toe on a 1h grid,
/// transmitted within 2h of their fit interval start (30s aligned).
pub fn random_records(
    rng: &mut SmallRng,
    sv: SV,
    size: usize,
    fit_intervals: &[f64],
) -> Vec<TestEphemeris> {
    (0..size)
        .map(|_| {
            let fit = fit_intervals[rng.random_range(0..fit_intervals.len())];
            let toe_s = 3600.0 * rng.random_range(6..160) as f64;
            let start_s = toe_s - fit * 1800.0;
            let how_s = start_s + 30.0 * rng.random_range(-240..=240) as f64;

            TestEphemeris::new(sv, toe_s)
                .with_fit_interval(fit)
                .with_transmission(how_s)
                .with_iodc(rng.random_range(0..1024))
                .with_mean_anomaly(rng.random_range(-3.0..3.0))
        })
        .collect()
}

/// Ephemeris retained by the overwrite rule, per fit interval start
pub fn retained(records: &[TestEphemeris]) -> Vec<(Epoch, Ephemeris)> {
    let mut retained: Vec<(Epoch, Ephemeris)> = Vec::new();
    for record in records.iter() {
        let ephemeris = record.build();
        let key = record.key();
        let tot = ephemeris.transmission_time().unwrap();
        match retained.iter_mut().find(|(k, _)| *k == key) {
            Some((_, incumbent)) => {
                if tot > incumbent.transmission_time().unwrap() {
                    *incumbent = ephemeris;
                }
            },
            None => retained.push((key, ephemeris)),
        }
    }
    retained.sort_by(|(a, _), (b, _)| a.cmp(b));
    retained
}
