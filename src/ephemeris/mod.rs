use crate::{
    constants::{DEFAULT_FIT_INTERVAL_HOURS, FRAME_PERIOD_SECONDS},
    prelude::{Constellation, Duration, Epoch, Error, TimeScale, WeekSecond, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub(crate) mod kepler;
pub(crate) mod ura;

pub use kepler::{EccentricAnomaly, Kepler, KeplerSolver, Perturbations};

/// Clock and health block (GPS subframe 1).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockSubframe {
    /// Handover word time (seconds of week)
    pub how: f64,
    /// Full week counter
    pub week: u32,
    /// Health bits
    pub health: u16,
    /// URA index
    pub ura: u8,
    /// Issue of data, clock
    pub iodc: u16,
    /// Time of clock (seconds of week)
    pub toc: f64,
    /// Clock bias (s)
    pub af0: f64,
    /// Clock drift (s.s⁻¹)
    pub af1: f64,
    /// Clock drift rate (s.s⁻²)
    pub af2: f64,
    /// Total group delay (s).
    /// Galileo: BGD E5a/E1
    pub tgd: f64,
    /// Galileo: BGD E5b/E1 (s)
    pub tgd2: Option<f64>,
}

/// First orbit block (GPS subframe 2).
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitSubframe {
    /// Handover word time (seconds of week)
    pub how: f64,
    /// Issue of data, ephemeris
    pub iode: u16,
    /// Amplitude of sine harmonic correction term of the orbit radius (m)
    pub crs_m: f64,
    /// Mean motion difference from computed value (rad.s⁻¹)
    pub dn_rad_s: f64,
    /// Mean anomaly at reference time (rad)
    pub m0_rad: f64,
    /// Amplitude of cosine harmonic correction term of the argument of latitude (rad)
    pub cuc_rad: f64,
    /// Eccentricity
    pub eccentricity: f64,
    /// Amplitude of sine harmonic correction term of the argument of latitude (rad)
    pub cus_rad: f64,
    /// Square root of semi major axis (m^1/2)
    pub sqrt_a: f64,
    /// Time of ephemeris (seconds of week)
    pub toe: f64,
    /// Fit interval (hours)
    pub fit_interval_hours: f64,
}

impl Default for OrbitSubframe {
    fn default() -> Self {
        Self {
            how: Default::default(),
            iode: Default::default(),
            crs_m: Default::default(),
            dn_rad_s: Default::default(),
            m0_rad: Default::default(),
            cuc_rad: Default::default(),
            eccentricity: Default::default(),
            cus_rad: Default::default(),
            sqrt_a: Default::default(),
            toe: Default::default(),
            fit_interval_hours: DEFAULT_FIT_INTERVAL_HOURS,
        }
    }
}

/// Second orbit block (GPS subframe 3).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientationSubframe {
    /// Handover word time (seconds of week)
    pub how: f64,
    /// Amplitude of cosine harmonic correction term of the angle of inclination (rad)
    pub cic_rad: f64,
    /// Longitude of ascending node at weekly epoch (rad)
    pub omega0_rad: f64,
    /// Amplitude of sine harmonic correction term of the angle of inclination (rad)
    pub cis_rad: f64,
    /// Inclination angle at reference time (rad)
    pub i0_rad: f64,
    /// Amplitude of cosine harmonic correction term of the orbit radius (m)
    pub crc_m: f64,
    /// Argument of perigee (rad)
    pub omega_rad: f64,
    /// Rate of right ascension (rad.s⁻¹)
    pub omega_dot_rad_s: f64,
    /// Rate of inclination angle (rad.s⁻¹)
    pub idot_rad_s: f64,
}

/// [Ephemeris] is one broadcast parameter set, assembled from its
/// three message blocks. Fields become available as soon as their
/// owning block has been supplied, accessors return [Error::FieldNotLoaded] otherwise.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ephemeris {
    /// [SV]
    pub sv: SV,
    clock: Option<ClockSubframe>,
    orbit: Option<OrbitSubframe>,
    orientation: Option<OrientationSubframe>,
}

impl std::fmt::Display for Ephemeris {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.sv)?;
        match self.toe() {
            Ok(toe) => write!(f, " TOE {}", WeekSecond::from(toe))?,
            Err(_) => write!(f, " TOE ?")?,
        }
        match self.toc() {
            Ok(toc) => write!(f, " TOC {}", WeekSecond::from(toc))?,
            Err(_) => write!(f, " TOC ?")?,
        }
        match self.transmission_time() {
            Ok(tot) => write!(f, " HOW {}", WeekSecond::from(tot)),
            Err(_) => write!(f, " HOW ?"),
        }
    }
}

impl Ephemeris {
    /// Creates a new (empty) [Ephemeris] for this [SV].
    /// Supply its message blocks with [Self::with_clock_subframe],
    /// [Self::with_orbit_subframe] and [Self::with_orientation_subframe].
    pub fn new(sv: SV) -> Self {
        Self {
            sv,
            clock: None,
            orbit: None,
            orientation: None,
        }
    }

    /// Copies and returns [Ephemeris] with clock block
    pub fn with_clock_subframe(&self, subframe: ClockSubframe) -> Self {
        let mut s = *self;
        s.clock = Some(subframe);
        s
    }

    /// Copies and returns [Ephemeris] with first orbit block
    pub fn with_orbit_subframe(&self, subframe: OrbitSubframe) -> Self {
        let mut s = *self;
        s.orbit = Some(subframe);
        s
    }

    /// Copies and returns [Ephemeris] with second orbit block
    pub fn with_orientation_subframe(&self, subframe: OrientationSubframe) -> Self {
        let mut s = *self;
        s.orientation = Some(subframe);
        s
    }

    /// Returns true once all three blocks have been supplied
    pub fn is_complete(&self) -> bool {
        self.clock.is_some() && self.orbit.is_some() && self.orientation.is_some()
    }

    pub(crate) fn clock_subframe(&self, field: &'static str) -> Result<&ClockSubframe, Error> {
        self.clock
            .as_ref()
            .ok_or(Error::FieldNotLoaded(self.sv, field))
    }

    pub(crate) fn orbit_subframe(&self, field: &'static str) -> Result<&OrbitSubframe, Error> {
        self.orbit
            .as_ref()
            .ok_or(Error::FieldNotLoaded(self.sv, field))
    }

    pub(crate) fn orientation_subframe(
        &self,
        field: &'static str,
    ) -> Result<&OrientationSubframe, Error> {
        self.orientation
            .as_ref()
            .ok_or(Error::FieldNotLoaded(self.sv, field))
    }

    /// Returns the [TimeScale] this [Ephemeris] is expressed in,
    /// which is the [SV] system time.
    pub fn timescale(&self) -> Result<TimeScale, Error> {
        keplerian_timescale(self.sv.constellation)
    }

    /// Returns health bits
    pub fn health(&self) -> Result<u16, Error> {
        Ok(self.clock_subframe("health")?.health)
    }

    /// Returns URA index
    pub fn ura(&self) -> Result<u8, Error> {
        Ok(self.clock_subframe("ura")?.ura)
    }

    /// Returns nominal accuracy in meters, from URA index
    pub fn accuracy_m(&self) -> Result<f64, Error> {
        Ok(ura::ura_to_accuracy(self.ura()?))
    }

    /// Returns Issue of Data Clock
    pub fn iodc(&self) -> Result<u16, Error> {
        Ok(self.clock_subframe("iodc")?.iodc)
    }

    /// Returns Issue of Data Ephemeris
    pub fn iode(&self) -> Result<u16, Error> {
        Ok(self.orbit_subframe("iode")?.iode)
    }

    /// Returns full week counter
    pub fn week(&self) -> Result<u32, Error> {
        Ok(self.clock_subframe("week")?.week)
    }

    /// Returns clock polynomial (bias (s), drift (s.s⁻¹), drift rate (s.s⁻²))
    pub fn clock_polynomial(&self) -> Result<(f64, f64, f64), Error> {
        let clock = self.clock_subframe("af0")?;
        Ok((clock.af0, clock.af1, clock.af2))
    }

    /// Returns total group delay
    pub fn tgd(&self) -> Result<Duration, Error> {
        Ok(Duration::from_seconds(self.clock_subframe("tgd")?.tgd))
    }

    /// Returns second group delay, if broadcast
    pub fn tgd2(&self) -> Result<Option<Duration>, Error> {
        Ok(self
            .clock_subframe("tgd2")?
            .tgd2
            .map(Duration::from_seconds))
    }

    /// Returns fit interval (hours)
    pub fn fit_interval_hours(&self) -> Result<f64, Error> {
        Ok(self.orbit_subframe("fit_interval")?.fit_interval_hours)
    }

    /// Returns fit interval as [Duration]
    pub fn fit_interval(&self) -> Result<Duration, Error> {
        Ok(Duration::from_seconds(self.fit_interval_hours()? * 3600.0))
    }

    /// Returns Time of Ephemeris, seconds of week
    pub fn toe_seconds(&self) -> Result<f64, Error> {
        Ok(self.orbit_subframe("toe")?.toe)
    }

    /// Returns Time of Clock, seconds of week
    pub fn toc_seconds(&self) -> Result<f64, Error> {
        Ok(self.clock_subframe("toc")?.toc)
    }

    /// Returns Time of Ephemeris as [Epoch], placed in the week
    /// nearest to the clock block transmission.
    pub fn toe(&self) -> Result<Epoch, Error> {
        let clock = self.clock_subframe("toe")?;
        let toe = self.toe_seconds()?;
        let ts = self.timescale()?;
        Ok(WeekSecond::nearest(clock.week, toe, clock.how, ts).to_epoch())
    }

    /// Returns Time of Clock as [Epoch], placed in the week
    /// nearest to the clock block transmission.
    pub fn toc(&self) -> Result<Epoch, Error> {
        let clock = self.clock_subframe("toc")?;
        let ts = self.timescale()?;
        Ok(WeekSecond::nearest(clock.week, clock.toc, clock.how, ts).to_epoch())
    }

    /// Returns the time this [Ephemeris] was transmitted: earliest handover
    /// time of all three blocks, aligned to the frame boundary.
    pub fn transmission_time(&self) -> Result<Epoch, Error> {
        let clock = self.clock_subframe("how")?;
        let orbit = self.orbit_subframe("how")?;
        let orientation = self.orientation_subframe("how")?;
        let ts = self.timescale()?;

        let how = clock.how.min(orbit.how).min(orientation.how);
        let sow = (how / FRAME_PERIOD_SECONDS).floor() * FRAME_PERIOD_SECONDS;

        Ok(WeekSecond::new(clock.week, sow, ts).to_epoch())
    }

    /// Returns start of the fit interval: ToE - fit/2.
    /// This is how the store indexes [Ephemeris].
    pub fn fit_interval_start(&self) -> Result<Epoch, Error> {
        let half_fit = Duration::from_seconds(self.fit_interval_hours()? * 1800.0);
        Ok(self.toe()? - half_fit)
    }

    /// Returns [Kepler]ian parameters
    pub fn kepler(&self) -> Result<Kepler, Error> {
        let orbit = self.orbit_subframe("kepler")?;
        let orientation = self.orientation_subframe("kepler")?;
        Ok(Kepler {
            sqrt_a: orbit.sqrt_a,
            e: orbit.eccentricity,
            i_0: orientation.i0_rad,
            omega_0: orientation.omega0_rad,
            m_0: orbit.m0_rad,
            omega: orientation.omega_rad,
            toe: orbit.toe,
        })
    }

    /// Returns orbit [Perturbations]
    pub fn perturbations(&self) -> Result<Perturbations, Error> {
        let orbit = self.orbit_subframe("perturbations")?;
        let orientation = self.orientation_subframe("perturbations")?;
        Ok(Perturbations {
            dn: orbit.dn_rad_s,
            i_dot: orientation.idot_rad_s,
            omega_dot: orientation.omega_dot_rad_s,
            cus: orbit.cus_rad,
            cuc: orbit.cuc_rad,
            cis: orientation.cis_rad,
            cic: orientation.cic_rad,
            crs: orbit.crs_m,
            crc: orientation.crc_m,
        })
    }

    /// Returns true if this [Ephemeris] is still valid,
    /// within `max_dtoe` of its ToE.
    pub fn is_valid(&self, now: Epoch, max_dtoe: Duration) -> Result<bool, Error> {
        Ok((now - self.toe()?).abs() < max_dtoe)
    }
}

/// Returns the system [TimeScale] of a [Constellation] broadcasting
/// Keplerian ephemerides.
pub(crate) fn keplerian_timescale(constellation: Constellation) -> Result<TimeScale, Error> {
    match constellation {
        Constellation::GPS
        | Constellation::QZSS
        | Constellation::Galileo
        | Constellation::BeiDou => constellation
            .timescale()
            .ok_or(Error::NonKeplerianConstellation(constellation)),
        _ => Err(Error::NonKeplerianConstellation(constellation)),
    }
}

/// [EphemerisSource] provides [Ephemeris] frames to consumers.
pub trait EphemerisSource {
    /// Provide [Ephemeris] frame applicable to requested [SV] at [Epoch].
    fn ephemeris_data(&self, epoch: Epoch, sv: SV) -> Option<Ephemeris>;
}
