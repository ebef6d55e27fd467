use log::{debug, warn};
use nalgebra::{Rotation3, Vector3};

use std::f64::consts::TAU;

use crate::{
    constants::{GROUND_TRANSMITTER_SQRT_A, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE_RAD},
    ellipsoid::Ellipsoid,
    prelude::{Epoch, Ephemeris, Error, SatelliteState},
    time::wrap_half_week,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Kepler] stores all keplerian parameters
#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct Kepler {
    /// Square root of semi major axis (m^1/2)
    pub sqrt_a: f64,
    /// Eccentricity (n.a)
    pub e: f64,
    /// Inclination angle at reference time (rad)
    pub i_0: f64,
    /// Longitude of ascending node at weekly epoch (rad)
    pub omega_0: f64,
    /// Mean anomaly at reference time (rad)
    pub m_0: f64,
    /// Argument of perigee (rad)
    pub omega: f64,
    /// Time of issue of ephemeris (seconds of week)
    pub toe: f64,
}

impl Kepler {
    /// Semi major axis (m)
    pub fn semi_major_axis_m(&self) -> f64 {
        self.sqrt_a.powi(2)
    }

    /// True when the parameters describe a ground transmitter
    /// rather than an orbiting vehicle.
    pub fn is_ground_transmitter(&self) -> bool {
        self.sqrt_a < GROUND_TRANSMITTER_SQRT_A
    }
}

/// Orbit [Perturbations]
#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct Perturbations {
    /// Mean motion difference from computed value (rad.s⁻¹)
    pub dn: f64,
    /// Inclination rate of change (rad.s⁻¹)
    pub i_dot: f64,
    /// Right ascension rate of change (rad.s⁻¹)
    pub omega_dot: f64,
    /// Amplitude of sine harmonic correction term of the argument
    /// of latitude (rad)
    pub cus: f64,
    /// Amplitude of cosine harmonic correction term of the argument
    /// of latitude (rad)
    pub cuc: f64,
    /// Amplitude of sine harmonic correction term of the angle of inclination (rad)
    pub cis: f64,
    /// Amplitude of cosine harmonic correction term of the angle of inclination (rad)
    pub cic: f64,
    /// Amplitude of sine harmonic correction term of the orbit radius (m)
    pub crs: f64,
    /// Amplitude of cosine harmonic correction term of the orbit radius (m)
    pub crc: f64,
}

/// Kepler equation solver (E = M + e sin E)
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeplerSolver {
    /// Iteration stops once the correction is below this value (rad)
    #[cfg_attr(feature = "serde", serde(default = "default_tolerance"))]
    pub tolerance_rad: f64,
    /// Hard iteration limit
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
}

fn default_tolerance() -> f64 {
    KEPLER_TOLERANCE_RAD
}

fn default_max_iterations() -> usize {
    KEPLER_MAX_ITERATIONS
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance_rad: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Solution of the Kepler equation
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EccentricAnomaly {
    /// Eccentric anomaly (rad)
    pub rad: f64,
    /// Number of iterations
    pub iterations: usize,
    /// False when the iteration limit was reached first
    pub converged: bool,
}

impl KeplerSolver {
    /// Solves the Kepler equation for mean anomaly `m` (rad) and eccentricity `e`,
    /// with Newton iterations seeded at M + e sin M.
    /// Reaching the iteration limit is not an error: the last iterate is returned.
    pub fn solve(&self, m: f64, e: f64) -> EccentricAnomaly {
        let mut e_k = m + e * m.sin();
        let mut iterations = 0;

        loop {
            let f = m - (e_k - e * e_k.sin());
            let g = 1.0 - e * e_k.cos();
            let de = f / g;

            e_k += de;
            iterations += 1;

            if de.abs() <= self.tolerance_rad {
                return EccentricAnomaly {
                    rad: e_k,
                    iterations,
                    converged: true,
                };
            }

            if iterations >= self.max_iterations {
                return EccentricAnomaly {
                    rad: e_k,
                    iterations,
                    converged: false,
                };
            }
        }
    }
}

impl Ephemeris {
    /// Resolves [SatelliteState] at `t`, using the default [KeplerSolver].
    /// `t` should be expressed in the [Ephemeris] timescale, no conversion is applied.
    pub fn propagate(&self, t: Epoch) -> Result<SatelliteState, Error> {
        self.propagate_with_solver(t, &KeplerSolver::default())
    }

    /// Resolves [SatelliteState] at `t`, using desired [KeplerSolver].
    pub fn propagate_with_solver(
        &self,
        t: Epoch,
        solver: &KeplerSolver,
    ) -> Result<SatelliteState, Error> {
        let kepler = self.kepler()?;
        let perturbations = self.perturbations()?;
        let (af0, af1, af2) = self.clock_polynomial()?;

        let toe = self.toe()?;
        let toc = self.toc()?;

        let t_k = wrap_half_week((t - toe).to_seconds());
        let t_c = wrap_half_week((t - toc).to_seconds());

        let ellipsoid = Ellipsoid::from_constellation(self.sv.constellation);
        let sqrt_gm = ellipsoid.gm_m3_s2.sqrt();
        let omega_earth = ellipsoid.angular_velocity_rad_s;

        let ground = kepler.is_ground_transmitter();
        let (e, idot) = if ground {
            (0.0, 0.0)
        } else {
            (kepler.e, perturbations.i_dot)
        };

        let sqrt_a = kepler.sqrt_a;
        let a = kepler.semi_major_axis_m();
        let n = sqrt_gm / (a * sqrt_a) + perturbations.dn;

        let m = if ground {
            kepler.m_0
        } else {
            kepler.m_0 + n * t_k
        };
        let m = m.rem_euclid(TAU);

        let anomaly = solver.solve(m, e);
        if !anomaly.converged {
            warn!(
                "{}({}) - kepler solver did not converge after {} iterations",
                t, self.sv, anomaly.iterations
            );
        }

        let e_k = anomaly.rad;
        let (sin_e_k, cos_e_k) = e_k.sin_cos();

        // clock
        let clock_drift = af1 + t_c * af2;
        let clock_bias = af0 + t_c * clock_drift;
        let relativistic = ellipsoid.relativistic_constant() * e * sqrt_a * sin_e_k;

        let q = (1.0 - e.powi(2)).sqrt();
        let g = 1.0 - e * cos_e_k;
        let v_k = (q * sin_e_k).atan2(cos_e_k - e);

        // argument of latitude and 2nd harmonic corrections
        let phi = v_k + kepler.omega;
        let (sin_2phi, cos_2phi) = (2.0 * phi).sin_cos();

        let (cus, cuc) = (perturbations.cus, perturbations.cuc);
        let (cis, cic) = (perturbations.cis, perturbations.cic);
        let (crs, crc) = (perturbations.crs, perturbations.crc);

        let du = cuc * cos_2phi + cus * sin_2phi;
        let dr = crc * cos_2phi + crs * sin_2phi;
        let di = cic * cos_2phi + cis * sin_2phi;

        let u_k = phi + du;
        let r_k = a * g + dr;
        let i_k = kepler.i_0 + idot * t_k + di;

        let omega_k = if ground {
            kepler.omega_0 - perturbations.omega_dot * kepler.toe
        } else {
            kepler.omega_0 + (perturbations.omega_dot - omega_earth) * t_k
                - omega_earth * kepler.toe
        };

        let (sin_u_k, cos_u_k) = u_k.sin_cos();
        let (x, y) = (r_k * cos_u_k, r_k * sin_u_k);

        // orbital plane to ECEF
        let rot_x3 = Rotation3::from_axis_angle(&Vector3::x_axis(), i_k);
        let rot_z3 = Rotation3::from_axis_angle(&Vector3::z_axis(), omega_k);
        let position = rot_z3 * rot_x3 * Vector3::new(x, y, 0.0);

        // velocity: time derivatives of the above
        let (sin_omega_k, cos_omega_k) = omega_k.sin_cos();
        let (sin_i_k, cos_i_k) = i_k.sin_cos();

        let de_k = n * a / r_k;
        let dl_k = sqrt_a * q * sqrt_gm / r_k.powi(2);
        let di_k = idot - 2.0 * dl_k * (cic * sin_2phi - cis * cos_2phi);
        let domega_k = perturbations.omega_dot - omega_earth;
        let du_k = dl_k * (1.0 + 2.0 * (cus * cos_2phi - cuc * sin_2phi));
        let dr_k = a * e * de_k * sin_e_k - 2.0 * dl_k * (crc * sin_2phi - crs * cos_2phi);

        let dx = dr_k * cos_u_k - r_k * sin_u_k * du_k;
        let dy = dr_k * sin_u_k + r_k * cos_u_k * du_k;

        let velocity = Vector3::new(
            dx * cos_omega_k - x * sin_omega_k * domega_k - dy * cos_i_k * sin_omega_k
                + y * (sin_i_k * sin_omega_k * di_k - cos_i_k * cos_omega_k * domega_k),
            dx * sin_omega_k + x * cos_omega_k * domega_k + dy * cos_i_k * cos_omega_k
                - y * (sin_i_k * cos_omega_k * di_k + cos_i_k * sin_omega_k * domega_k),
            dy * sin_i_k + y * cos_i_k * di_k,
        );

        debug!(
            "{}({}) - kepler solving x={:.3}m y={:.3}m z={:.3}m t_k={}s ({} iter)",
            t, self.sv, position[0], position[1], position[2], t_k, anomaly.iterations
        );

        Ok(SatelliteState {
            epoch: t,
            position,
            velocity,
            clock_bias,
            clock_drift,
            relativistic_correction: relativistic,
        })
    }
}

#[cfg(test)]
mod test {
    use super::KeplerSolver;
    use std::f64::consts::PI;

    #[test]
    fn circular_orbit() {
        let solver = KeplerSolver::default();
        for m in [0.0, 0.5, 1.0, PI, 5.0] {
            let anomaly = solver.solve(m, 0.0);
            assert!(anomaly.converged);
            assert_eq!(anomaly.rad, m);
        }
    }

    #[test]
    fn kepler_equation_residual() {
        let solver = KeplerSolver::default();
        for e in [0.001, 0.01, 0.02, 0.05] {
            for i in 0..64 {
                let m = i as f64 * 0.1;
                let anomaly = solver.solve(m, e);
                assert!(anomaly.converged);
                let residual = anomaly.rad - e * anomaly.rad.sin() - m;
                assert!(residual.abs() < 1.0E-10, "e={} m={} residual={}", e, m, residual);
            }
        }
    }

    #[test]
    fn iteration_limit() {
        let solver = KeplerSolver {
            tolerance_rad: 0.0,
            max_iterations: 3,
        };
        let anomaly = solver.solve(1.0, 0.5);
        assert_eq!(anomaly.iterations, 3);
    }
}
