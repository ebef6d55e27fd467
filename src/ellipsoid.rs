use crate::{
    constants::{
        EARTH_ANGULAR_VEL_CGCS2000_RAD, EARTH_ANGULAR_VEL_RAD, EARTH_GRAVITATION_GPS_MU_M3_S2,
        EARTH_GRAVITATION_MU_M3_S2, SPEED_OF_LIGHT_M_S,
    },
    prelude::Constellation,
};

/// Earth model constants a constellation's interface specification
/// defines its broadcast ephemerides against.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipsoid {
    /// Earth gravitational constant (m^3 s-2)
    pub gm_m3_s2: f64,
    /// Earth angular velocity (rad/s)
    pub angular_velocity_rad_s: f64,
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::gps()
    }
}

impl Ellipsoid {
    /// WGS84 as described by the GPS interface specification
    pub const fn gps() -> Self {
        Self {
            gm_m3_s2: EARTH_GRAVITATION_GPS_MU_M3_S2,
            angular_velocity_rad_s: EARTH_ANGULAR_VEL_RAD,
        }
    }

    /// GTRF as described by the Galileo interface specification
    pub const fn galileo() -> Self {
        Self {
            gm_m3_s2: EARTH_GRAVITATION_MU_M3_S2,
            angular_velocity_rad_s: EARTH_ANGULAR_VEL_RAD,
        }
    }

    /// CGCS2000 as described by the BeiDou interface specification
    pub const fn beidou() -> Self {
        Self {
            gm_m3_s2: EARTH_GRAVITATION_MU_M3_S2,
            angular_velocity_rad_s: EARTH_ANGULAR_VEL_CGCS2000_RAD,
        }
    }

    /// Selects the [Ellipsoid] of this [Constellation].
    /// Constellations without dedicated definitions use [Ellipsoid::gps].
    pub fn from_constellation(constellation: Constellation) -> Self {
        match constellation {
            Constellation::Galileo => Self::galileo(),
            Constellation::BeiDou => Self::beidou(),
            _ => Self::gps(),
        }
    }

    /// Relativistic correction constant F = -2 sqrt(GM) / c² (s.m^-1/2)
    pub fn relativistic_constant(&self) -> f64 {
        -2.0 * self.gm_m3_s2.sqrt() / SPEED_OF_LIGHT_M_S.powi(2)
    }
}
