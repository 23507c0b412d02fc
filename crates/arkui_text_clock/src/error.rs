//! TextClock error types

use thiserror::Error;

/// Errors from TextClock configuration
///
/// Refresh never surfaces these; invalid input falls back to a default instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextClockError {
    /// The pattern has no date or time field
    #[error("format `{0}` contains no date or time field")]
    NoTimeFields(String),

    /// Zone offset outside the valid `hoursWest` range
    #[error("hours west {0} is outside [-14, 12]")]
    ZoneOutOfRange(f64),

    /// Zone offset is not a number
    #[error("hours west is not a number")]
    ZoneNotANumber,
}
