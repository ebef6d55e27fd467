use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    prelude::{Constellation, EphemerisStore},
    tests::{
        fuzz::{random_records, retained},
        gpst, init_logger, G01, G02, G05,
    },
};

#[test]
fn bounds_follow_accepted_insertions() {
    init_logger();

    let mut rng = SmallRng::seed_from_u64(1234);

    let mut store = EphemerisStore::new(Constellation::GPS).unwrap();

    let (mut initial, mut t_final) = (None, None);

    for sv in [G01, G02, G05] {
        for record in random_records(&mut rng, sv, 50, &[4.0, 6.0]) {
            let key = record.key();
            let end = key + record.build().fit_interval().unwrap();

            if store.add_ephemeris(record.build()).unwrap() {
                initial = Some(initial.map_or(key, |t| if key < t { key } else { t }));
                t_final = Some(t_final.map_or(end, |t| if end > t { end } else { t }));
            }

            assert_eq!(store.initial_time(), initial);
            assert_eq!(store.final_time(), t_final);
        }
    }
}

#[test]
fn overwrite_and_pruning() {
    init_logger();

    let mut rng = SmallRng::seed_from_u64(0xcafe);

    let mut store = EphemerisStore::new(Constellation::GPS).unwrap();

    let records = random_records(&mut rng, G01, 300, &[4.0, 6.0]);

    // any delivery order: same retained set
    for record in records.iter().rev() {
        store.add_ephemeris(record.build()).unwrap();
    }

    let expected = retained(&records);
    let stored = store.ephemerides(G01).unwrap();

    assert_eq!(stored.len(), expected.len());
    for (key, ephemeris) in expected.iter() {
        assert_eq!(
            stored.get(key).map(|stored| stored.transmission_time()),
            Some(ephemeris.transmission_time())
        );
    }

    // second delivery does not modify anything
    for record in records.iter() {
        assert_eq!(store.add_ephemeris(record.build()), Ok(false));
    }

    let (t_min, t_max) = (gpst(100_000.0), gpst(400_000.0));
    store.edit(t_min, t_max);

    assert_eq!(store.initial_time(), Some(t_min));
    assert_eq!(store.final_time(), Some(t_max));

    let remaining = expected
        .iter()
        .filter(|(key, _)| *key >= t_min && *key <= t_max)
        .count();

    assert_eq!(store.len(), remaining);
    assert!(store.iter().all(|ephemeris| {
        let key = ephemeris.fit_interval_start().unwrap();
        key >= t_min && key <= t_max
    }));
}
