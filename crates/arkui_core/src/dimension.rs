//! Unit-tagged lengths

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionParseError {
    #[error("dimension string is empty")]
    Empty,

    #[error("dimension `{0}` has no numeric value")]
    BadNumber(String),
}

/// Length unit
///
/// Unknown unit strings resolve to [`DimensionUnit::Vp`], matching how the platform
/// reports unit-less float resources.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    Px,
    #[default]
    Vp,
    Fp,
    Lpx,
    Percent,
}

impl DimensionUnit {
    /// Map a platform unit suffix to a unit
    pub fn from_unit_str(unit: &str) -> Self {
        match unit.trim() {
            "px" => Self::Px,
            "fp" => Self::Fp,
            "lpx" => Self::Lpx,
            "%" => Self::Percent,
            _ => Self::Vp,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Vp => "vp",
            Self::Fp => "fp",
            Self::Lpx => "lpx",
            Self::Percent => "%",
        }
    }
}

/// A length value with its unit
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    pub unit: DimensionUnit,
}

impl Dimension {
    pub const fn new(value: f64, unit: DimensionUnit) -> Self {
        Self { value, unit }
    }

    pub const fn vp(value: f64) -> Self {
        Self::new(value, DimensionUnit::Vp)
    }

    pub const fn px(value: f64) -> Self {
        Self::new(value, DimensionUnit::Px)
    }

    /// Build from a float plus the unit string the platform reports alongside it
    pub fn from_value_and_unit(value: f64, unit: &str) -> Self {
        Self::new(value, DimensionUnit::from_unit_str(unit))
    }
}

impl FromStr for Dimension {
    type Err = DimensionParseError;

    /// Parses `16`, `16vp`, `12.5fp`, `50%`, `2px`, `4lpx`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DimensionParseError::Empty);
        }
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let value: f64 = number
            .parse()
            .map_err(|_| DimensionParseError::BadNumber(s.to_string()))?;
        Ok(Self::from_value_and_unit(value, unit))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_strings_map_to_units() {
        assert_eq!(DimensionUnit::from_unit_str("px"), DimensionUnit::Px);
        assert_eq!(DimensionUnit::from_unit_str("fp"), DimensionUnit::Fp);
        assert_eq!(DimensionUnit::from_unit_str("lpx"), DimensionUnit::Lpx);
        assert_eq!(DimensionUnit::from_unit_str("%"), DimensionUnit::Percent);
        assert_eq!(DimensionUnit::from_unit_str("vp"), DimensionUnit::Vp);
        assert_eq!(DimensionUnit::from_unit_str(""), DimensionUnit::Vp);
        assert_eq!(DimensionUnit::from_unit_str("em"), DimensionUnit::Vp);
    }

    #[test]
    fn parses_value_with_suffix() {
        assert_eq!("16vp".parse::<Dimension>().unwrap(), Dimension::vp(16.0));
        assert_eq!("2.5px".parse::<Dimension>().unwrap(), Dimension::px(2.5));
        assert_eq!(
            "50%".parse::<Dimension>().unwrap(),
            Dimension::new(50.0, DimensionUnit::Percent)
        );
        assert_eq!("12".parse::<Dimension>().unwrap(), Dimension::vp(12.0));
        assert!("vp".parse::<Dimension>().is_err());
    }
}
