use anise::math::Vector6;

use crate::prelude::{Epoch, Frame, Orbit, Vector3, SV};

/// [SatelliteState] is the propagated state of a satellite:
/// position, velocity and clock state, at a given [Epoch].
/// It is computed on every request and never cached.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SatelliteState {
    /// [Epoch] of this state
    pub epoch: Epoch,
    /// ECEF position (m)
    pub position: Vector3<f64>,
    /// ECEF velocity (m.s⁻¹)
    pub velocity: Vector3<f64>,
    /// Clock bias (s)
    pub clock_bias: f64,
    /// Clock drift (s.s⁻¹)
    pub clock_drift: f64,
    /// Relativistic correction (s)
    pub relativistic_correction: f64,
}

impl std::fmt::Display for SatelliteState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} x={:.3}m y={:.3}m z={:.3}m vx={:.3}m/s vy={:.3}m/s vz={:.3}m/s clk={:.6E}s drift={:.6E}s/s rel={:.6E}s",
            self.epoch,
            self.position[0],
            self.position[1],
            self.position[2],
            self.velocity[0],
            self.velocity[1],
            self.velocity[2],
            self.clock_bias,
            self.clock_drift,
            self.relativistic_correction,
        )
    }
}

impl SatelliteState {
    /// Total clock correction (s): bias + relativistic correction.
    pub fn clock_correction(&self) -> f64 {
        self.clock_bias + self.relativistic_correction
    }

    /// Distance to Earth center (m)
    pub fn radius_m(&self) -> f64 {
        self.position.norm()
    }

    /// Converts to [Orbit] expressed in this (Earth fixed) [Frame].
    pub fn to_orbit(&self, frame: Frame) -> Orbit {
        let (pos, vel) = (self.position / 1.0E3, self.velocity / 1.0E3);
        Orbit::from_cartesian_pos_vel(
            Vector6::new(pos[0], pos[1], pos[2], vel[0], vel[1], vel[2]),
            self.epoch,
            frame,
        )
    }
}

/// Any [Orbit] provider should implement the [OrbitSource] trait.
pub trait OrbitSource {
    /// Provide [Orbit]al state of this [SV], at requested [Epoch],
    /// expressed in requested [Frame]. The [Frame] should be Earth fixed,
    /// broadcast ephemerides being defined in such a frame.
    fn state_at(&self, epoch: Epoch, sv: SV, fr: Frame) -> Option<Orbit>;
}
