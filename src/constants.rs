use anise::constants::SPEED_OF_LIGHT_KM_S;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = SPEED_OF_LIGHT_KM_S * 1000.0;

/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD: f64 = 7.2921151467E-5;

/// Earth angular velocity, in CGCS2000 frame rad/s
pub const EARTH_ANGULAR_VEL_CGCS2000_RAD: f64 = 7.292115E-5;

/// Earth gravitational constant (m^3 s-2) used by the GPS interface specification
pub const EARTH_GRAVITATION_GPS_MU_M3_S2: f64 = 3.986005E14;

/// Earth gravitational constant (m^3 s-2) used by Galileo and BeiDou
pub const EARTH_GRAVITATION_MU_M3_S2: f64 = 3.986004418E14;

/// Seconds in half a week
pub const HALF_WEEK_SECONDS: f64 = 302_400.0;

/// Seconds in a week
pub const WEEK_SECONDS: f64 = 604_800.0;

/// Navigation message frames start on 30s boundaries
pub const FRAME_PERIOD_SECONDS: f64 = 30.0;

/// Default fit interval of a broadcast ephemeris, in hours.
/// Store lookups start this far behind the query time.
pub const DEFAULT_FIT_INTERVAL_HOURS: f64 = 4.0;

/// Square root of semi major axis below which the vehicle
/// is considered a ground transmitter (pseudolite).
pub const GROUND_TRANSMITTER_SQRT_A: f64 = 2550.0;

/// Kepler solver default convergence criteria (rad)
pub const KEPLER_TOLERANCE_RAD: f64 = 1.0E-11;

/// Kepler solver default iteration limit
pub const KEPLER_MAX_ITERATIONS: usize = 20;
