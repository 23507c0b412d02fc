//! `hoursWest` zone offsets
//!
//! A TextClock may show a zone other than the local one, given as hours west of UTC
//! (so UTC+8 is `-8`). Valid offsets lie in `[-14, 12]`. Fractional offsets are kept
//! only for zones that really use them; any other fraction is truncated toward zero.

use chrono::FixedOffset;

use crate::error::TextClockError;

pub const HOURS_WEST_MIN: f64 = -14.0;
pub const HOURS_WEST_MAX: f64 = 12.0;

/// Half- and quarter-hour zones, in hours west
const FRACTIONAL_ZONES: &[f64] = &[9.5, 3.5, 2.5, -3.5, -4.5, -5.5, -5.75, -6.5, -9.5, -10.5, -12.75];

/// A validated zone offset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoursWest(f64);

impl HoursWest {
    pub fn hours(&self) -> f64 {
        self.0
    }

    /// Offset east of UTC as chrono sees it
    pub fn to_offset(&self) -> FixedOffset {
        let seconds = (-self.0 * 3600.0).round() as i32;
        FixedOffset::east_opt(seconds).unwrap_or_else(utc)
    }
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap_or_else(|| unreachable!("zero offset is always valid"))
}

impl TryFrom<f64> for HoursWest {
    type Error = TextClockError;

    fn try_from(hours: f64) -> Result<Self, Self::Error> {
        if hours.is_nan() {
            return Err(TextClockError::ZoneNotANumber);
        }
        if !(HOURS_WEST_MIN..=HOURS_WEST_MAX).contains(&hours) {
            return Err(TextClockError::ZoneOutOfRange(hours));
        }
        if hours.fract() == 0.0 || FRACTIONAL_ZONES.iter().any(|z| (z - hours).abs() < 1e-6) {
            return Ok(Self(hours));
        }
        Ok(Self(hours.trunc()))
    }
}

/// Validate an optional offset; anything invalid means local time
pub fn resolve_hours_west(hours: Option<f64>) -> Option<HoursWest> {
    let hours = hours?;
    match HoursWest::try_from(hours) {
        Ok(zone) => Some(zone),
        Err(err) => {
            tracing::debug!("{}, using local time", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn range_is_enforced() {
        assert_eq!(HoursWest::try_from(-14.0).map(|z| z.hours()), Ok(-14.0));
        assert_eq!(HoursWest::try_from(12.0).map(|z| z.hours()), Ok(12.0));
        assert_eq!(HoursWest::try_from(12.5), Err(TextClockError::ZoneOutOfRange(12.5)));
        assert_eq!(HoursWest::try_from(f64::NAN), Err(TextClockError::ZoneNotANumber));
    }

    #[test]
    fn unknown_fractions_are_truncated() {
        assert_eq!(HoursWest::try_from(-5.75).map(|z| z.hours()), Ok(-5.75));
        assert_eq!(HoursWest::try_from(-5.3).map(|z| z.hours()), Ok(-5.0));
        assert_eq!(HoursWest::try_from(3.9).map(|z| z.hours()), Ok(3.0));
    }

    #[test]
    fn offsets_point_east() {
        let zone = HoursWest::try_from(-8.0).unwrap();
        assert_eq!(zone.to_offset().local_minus_utc(), 8 * 3600);
        let zone = HoursWest::try_from(-5.75).unwrap();
        assert_eq!(zone.to_offset().local_minus_utc(), 20_700);
    }

    #[test]
    fn invalid_offsets_mean_local_time() {
        assert_eq!(resolve_hours_west(None), None);
        assert_eq!(resolve_hours_west(Some(99.0)), None);
        assert_eq!(resolve_hours_west(Some(2.0)).map(|z| z.hours()), Some(2.0));
    }
}
