use log::info;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    prelude::{Constellation, Duration, Epoch, Ephemeris, EphemerisStore, Error},
    tests::{
        fuzz::{random_records, retained},
        gpst, init_logger, G01, G02,
    },
};

/// Exhaustive user (strict) selection
fn user_oracle(entries: &[(Epoch, Ephemeris)], t: Epoch) -> Option<Ephemeris> {
    let mut best: Option<(Ephemeris, Epoch)> = None;
    for (start, ephemeris) in entries.iter() {
        let fit = ephemeris.fit_interval().unwrap();
        let tot = ephemeris.transmission_time().unwrap();
        if *start <= t && t < *start + fit && tot <= t {
            if best.map_or(true, |(_, best_tot)| tot > best_tot) {
                best = Some((*ephemeris, tot));
            }
        }
    }
    best.map(|(ephemeris, _)| ephemeris)
}

/// Exhaustive near selection
fn near_oracle(entries: &[(Epoch, Ephemeris)], t: Epoch) -> Option<Ephemeris> {
    let mut best: Option<(Ephemeris, Duration)> = None;
    for (start, ephemeris) in entries.iter() {
        let fit = ephemeris.fit_interval().unwrap();
        let distance = (t - ephemeris.transmission_time().unwrap()).abs();
        if *start <= t && t <= *start + fit {
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((*ephemeris, distance));
            }
        }
    }
    best.map(|(ephemeris, _)| ephemeris)
}

#[test]
fn selection_matches_exhaustive_search() {
    init_logger();

    let mut rng = SmallRng::seed_from_u64(0x5eed);

    for round in 0..20 {
        let mut store = EphemerisStore::new(Constellation::GPS).unwrap();

        let records = random_records(&mut rng, G01, 40, &[4.0]);
        for record in records.iter() {
            store.add_ephemeris(record.build()).unwrap();
        }

        let entries = retained(&records);
        assert_eq!(store.len(), entries.len(), "round #{}", round);

        for _ in 0..200 {
            let t = gpst(rng.random_range(0..600_000) as f64);

            let user = store.find_user_ephemeris(G01, t).ok().copied();
            assert_eq!(user, user_oracle(&entries, t), "round #{} user({})", round, t);

            let near = store.find_near_ephemeris(G01, t).ok().copied();
            assert_eq!(near, near_oracle(&entries, t), "round #{} near({})", round, t);

            // near is less restrictive
            if user.is_some() {
                assert!(near.is_some());
            }
        }

        info!("round #{} - {} entries", round, entries.len());
    }
}

#[test]
fn selected_windows_contain_query() {
    init_logger();

    let mut rng = SmallRng::seed_from_u64(42);

    let mut store = EphemerisStore::new(Constellation::GPS).unwrap();

    for record in random_records(&mut rng, G02, 200, &[4.0, 6.0, 8.0]) {
        store.add_ephemeris(record.build()).unwrap();
    }

    for _ in 0..2000 {
        let t = gpst(rng.random_range(0..600_000) as f64);

        match store.find_user_ephemeris(G02, t) {
            Ok(ephemeris) => {
                let start = ephemeris.fit_interval_start().unwrap();
                let fit = ephemeris.fit_interval().unwrap();
                assert!(start <= t && t < start + fit);
                assert!(ephemeris.transmission_time().unwrap() <= t);
            },
            Err(e) => assert_eq!(e, Error::NoApplicableEphemeris(G02, t)),
        }

        match store.find_near_ephemeris(G02, t) {
            Ok(ephemeris) => {
                let start = ephemeris.fit_interval_start().unwrap();
                let fit = ephemeris.fit_interval().unwrap();
                assert!(start <= t && t <= start + fit);
            },
            Err(e) => assert_eq!(e, Error::NoApplicableEphemeris(G02, t)),
        }
    }
}
