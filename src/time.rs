//! Week counter and seconds of week representation
use crate::{
    constants::{HALF_WEEK_SECONDS, WEEK_SECONDS},
    prelude::{Duration, Epoch, TimeScale},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [WeekSecond] is the (week counter, seconds of week) view of an [Epoch],
/// as used by navigation messages. The week counter is expressed in the
/// attached [TimeScale] (rolling from that timescale reference epoch).
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeekSecond {
    /// Week counter
    pub week: u32,
    /// Seconds of week
    pub seconds: f64,
    /// [TimeScale] this is expressed in
    pub timescale: TimeScale,
}

impl std::fmt::Display for WeekSecond {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:04} {:10.3} {}", self.week, self.seconds, self.timescale)
    }
}

impl From<Epoch> for WeekSecond {
    fn from(t: Epoch) -> Self {
        let (week, nanos) = t.to_time_of_week();
        Self {
            week,
            seconds: nanos as f64 / 1.0E9,
            timescale: t.time_scale,
        }
    }
}

impl From<WeekSecond> for Epoch {
    fn from(ws: WeekSecond) -> Self {
        ws.to_epoch()
    }
}

impl WeekSecond {
    /// Builds a new [WeekSecond]
    pub fn new(week: u32, seconds: f64, timescale: TimeScale) -> Self {
        Self {
            week,
            seconds,
            timescale,
        }
    }

    /// Places a seconds of week value in the week nearest to the
    /// `reference` seconds of week, itself in `week`.
    /// This resolves the week rollover between a reference epoch (Toe, Toc)
    /// and the time the message was received.
    pub fn nearest(week: u32, seconds: f64, reference: f64, timescale: TimeScale) -> Self {
        let dt = seconds - reference;
        let week = if dt < -HALF_WEEK_SECONDS {
            week + 1
        } else if dt > HALF_WEEK_SECONDS {
            week.saturating_sub(1)
        } else {
            week
        };
        Self::new(week, seconds, timescale)
    }

    /// Converts to [Epoch]. Seconds of week outside [0, 1 week[
    /// roll over into the neighboring weeks.
    pub fn to_epoch(&self) -> Epoch {
        let week_nanos = WEEK_SECONDS as i64 * 1_000_000_000;
        let nanos = (self.seconds * 1.0E9).round() as i64;

        let week = self.week as i64 + nanos.div_euclid(week_nanos);
        let nanos = nanos.rem_euclid(week_nanos) as u64;

        match u32::try_from(week) {
            Ok(week) => Epoch::from_time_of_week(week, nanos, self.timescale),
            Err(_) => {
                // prior to the timescale origin
                Epoch::from_time_of_week(0, 0, self.timescale)
                    + Duration::from_seconds(self.week as f64 * WEEK_SECONDS + self.seconds)
            },
        }
    }

    /// Returns day of week, 0 being the first day of the week
    pub fn day_of_week(&self) -> u8 {
        (self.seconds / 86_400.0).floor() as u8
    }
}

/// Wraps a time difference (s) into [-half week; +half week],
/// to choose the representation nearest to the reference week.
pub(crate) fn wrap_half_week(dt_s: f64) -> f64 {
    if dt_s > HALF_WEEK_SECONDS {
        dt_s - WEEK_SECONDS * ((dt_s + HALF_WEEK_SECONDS) / WEEK_SECONDS).floor()
    } else if dt_s < -HALF_WEEK_SECONDS {
        dt_s + WEEK_SECONDS * ((HALF_WEEK_SECONDS - dt_s) / WEEK_SECONDS).floor()
    } else {
        dt_s
    }
}
