use rstest::*;

use crate::{
    prelude::{Duration, Ellipsoid, Ephemeris, Error, KeplerSolver, OrientationSubframe},
    tests::{epoch, gpst, init_logger, TestEphemeris, C06, E01, G01, TEST_WEEK},
};

#[fixture]
fn circular() -> TestEphemeris {
    TestEphemeris::new(G01, 0.0)
        .with_transmission(0.0)
        .without_harmonics()
}

#[rstest]
fn radius_sanity(circular: TestEphemeris) {
    init_logger();

    let ephemeris = circular.build();
    let t = gpst(0.0);

    let state = ephemeris.propagate(t).unwrap();

    let a = circular.sqrt_a.powi(2);
    let r = state.radius_m();

    assert!(r >= a * (1.0 - circular.e), "|r|={}m too small", r);
    assert!(r <= a * (1.0 + circular.e), "|r|={}m too large", r);

    // orbital velocity ~3.9 km/s, minus earth rotation
    let v = state.velocity.norm();
    assert!(v > 2000.0 && v < 5000.0, "|v|={}m/s", v);

    assert_eq!(state.epoch, t);
}

#[rstest]
fn determinism(circular: TestEphemeris) {
    init_logger();

    let ephemeris = circular.with_orbit(5153.7, 0.02).build();

    for dt_s in [0.0, 30.0, 3600.0, 7199.0] {
        let t = gpst(dt_s);
        let first = ephemeris.propagate(t).unwrap();
        let second = ephemeris.propagate(t).unwrap();
        assert_eq!(first, second);
    }
}

#[rstest]
#[case(TestEphemeris::new(G01, 7200.0))]
#[case(TestEphemeris::new(G01, 7200.0).with_orbit(5153.6, 0.002))]
#[case(TestEphemeris::new(E01, 7200.0).with_orbit(5440.6, 0.0003))]
#[case(TestEphemeris::new(C06, 7200.0).with_orbit(6493.4, 0.005))]
fn velocity_consistency(#[case] record: TestEphemeris) {
    init_logger();

    let ephemeris = record.build();
    let half_step = Duration::from_seconds(0.5);

    for dt_s in [0.0, 1234.0, 7200.0, 10000.0] {
        let t = epoch(record.sv, TEST_WEEK, dt_s);

        let state = ephemeris.propagate(t).unwrap();
        let before = ephemeris.propagate(t - half_step).unwrap();
        let after = ephemeris.propagate(t + half_step).unwrap();

        let numerical = after.position - before.position;
        let err = (numerical - state.velocity).norm();

        assert!(
            err < 1.0,
            "{}({}) velocity error {}m/s: analytical={} numerical={}",
            t,
            record.sv,
            err,
            state.velocity,
            numerical
        );
    }
}

#[test]
fn clock_polynomial() {
    init_logger();

    let (af0, af1, af2) = (-1.0E-4, 2.0E-11, 1.0E-18);

    let ephemeris = TestEphemeris::new(G01, 7200.0)
        .with_clock(3600.0, af0, af1, af2)
        .build();

    let dt = 1000.0;
    let state = ephemeris.propagate(gpst(3600.0 + dt)).unwrap();

    let drift = af1 + af2 * dt;
    let bias = af0 + dt * drift;

    assert!((state.clock_drift - drift).abs() < 1.0E-24);
    assert!((state.clock_bias - bias).abs() < 1.0E-18);
    assert!(
        (state.clock_correction() - (state.clock_bias + state.relativistic_correction)).abs()
            < 1.0E-18
    );
}

#[test]
fn relativistic_correction() {
    init_logger();

    let f = Ellipsoid::gps().relativistic_constant();

    let record = TestEphemeris::new(G01, 7200.0).with_orbit(5153.7, 0.02);
    let ephemeris = record.build();

    let bound = (f * record.e * record.sqrt_a).abs();
    assert!(bound > 4.0E-8 && bound < 5.0E-8);

    for dt_s in [0.0, 1800.0, 3600.0, 5400.0] {
        let state = ephemeris.propagate(gpst(dt_s)).unwrap();
        assert!(state.relativistic_correction.abs() <= bound);
    }

    // no correction on circular orbits
    let ephemeris = record.with_orbit(5153.7, 0.0).build();
    let state = ephemeris.propagate(gpst(3600.0)).unwrap();
    assert_eq!(state.relativistic_correction, 0.0);
}

#[test]
fn half_week_wrapping() {
    init_logger();

    let ephemeris = TestEphemeris::new(G01, 7200.0).build();

    let t = gpst(7200.0);
    let state = ephemeris.propagate(t).unwrap();

    // one week later: same reference instant
    let next_week = ephemeris.propagate(t + Duration::from_seconds(604_800.0)).unwrap();

    assert_eq!(state.position, next_week.position);
    assert_eq!(state.velocity, next_week.velocity);
    assert_eq!(state.clock_bias, next_week.clock_bias);
}

#[test]
fn week_rollover() {
    init_logger();

    // received saturday evening: toe falls in next week
    let ephemeris = TestEphemeris::new(G01, 0.0)
        .with_transmission(597_600.0)
        .build();

    assert_eq!(ephemeris.toe(), Ok(epoch(G01, TEST_WEEK + 1, 0.0)));

    let state = ephemeris
        .propagate(epoch(G01, TEST_WEEK, 604_000.0))
        .unwrap();

    let a = 5153.7_f64.powi(2);
    assert!(state.radius_m() > a * 0.98 && state.radius_m() < a * 1.02);
}

#[test]
fn ground_transmitter() {
    init_logger();

    let ephemeris = TestEphemeris::new(G01, 7200.0)
        .with_orbit(2000.0, 0.3)
        .build();

    let first = ephemeris.propagate(gpst(3600.0)).unwrap();
    let second = ephemeris.propagate(gpst(9000.0)).unwrap();

    // mean anomaly does not advance, ascending node does not rotate
    assert_eq!(first.position, second.position);
    assert_eq!(first.relativistic_correction, 0.0);
    assert_eq!(second.relativistic_correction, 0.0);
}

#[test]
fn ellipsoid_selection() {
    init_logger();

    let gps = TestEphemeris::new(G01, 7200.0).build();
    let galileo = TestEphemeris::new(E01, 7200.0).build();

    let gps = gps.propagate(gpst(10800.0)).unwrap();
    let galileo = galileo.propagate(epoch(E01, TEST_WEEK, 10800.0)).unwrap();

    // same parameters, slightly different mean motion
    let diff = (gps.position - galileo.position).norm();
    assert!(diff > 0.0 && diff < 100.0, "diff={}m", diff);
}

#[test]
fn kepler_convergence() {
    init_logger();

    let solver = KeplerSolver::default();

    for i in 0..=50 {
        let e = i as f64 * 0.001;
        for j in 0..360 {
            let m = (j as f64).to_radians();
            let anomaly = solver.solve(m, e);
            assert!(anomaly.converged, "e={} m={}", e, m);
            assert!(
                anomaly.iterations <= 5,
                "e={} m={}: {} iterations",
                e,
                m,
                anomaly.iterations
            );
        }
    }

    for j in 0..360 {
        let m = (j as f64).to_radians();
        let anomaly = solver.solve(m, 0.99);
        assert!(anomaly.iterations <= 20);
        assert!(anomaly.rad.is_finite());
    }
}

#[test]
fn custom_solver() {
    init_logger();

    let ephemeris = TestEphemeris::new(G01, 7200.0).with_orbit(5153.7, 0.9).build();
    let t = gpst(5000.0);

    let coarse = KeplerSolver {
        tolerance_rad: 1.0E-3,
        max_iterations: 2,
    };

    let precise = ephemeris.propagate(t).unwrap();
    let coarse = ephemeris.propagate_with_solver(t, &coarse).unwrap();

    assert!(precise.position.iter().all(|x| x.is_finite()));
    assert!(coarse.position.iter().all(|x| x.is_finite()));
    assert_ne!(precise.position, coarse.position);
}

#[test]
fn missing_blocks() {
    init_logger();

    let record = TestEphemeris::new(G01, 7200.0);

    let ephemeris = Ephemeris::new(G01)
        .with_clock_subframe(record.clock_subframe())
        .with_orbit_subframe(record.orbit_subframe());

    assert_eq!(
        ephemeris.propagate(gpst(7200.0)),
        Err(Error::FieldNotLoaded(G01, "kepler"))
    );

    let ephemeris = Ephemeris::new(G01)
        .with_orbit_subframe(record.orbit_subframe())
        .with_orientation_subframe(OrientationSubframe::default());

    assert_eq!(
        ephemeris.propagate(gpst(7200.0)),
        Err(Error::FieldNotLoaded(G01, "af0"))
    );
}
