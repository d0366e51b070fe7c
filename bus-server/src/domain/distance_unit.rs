//! Units for reporting distances.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Mean earth radius in metres, as used for geodesic lengths.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Units a caller may ask distances to be reported in.
///
/// `Acres` and `Hectares` are area units. They are accepted when parsing so
/// the request layer can report a precise error, but they have no length
/// factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Meters,
    Millimeters,
    Centimeters,
    #[default]
    Kilometers,
    Acres,
    Miles,
    NauticalMiles,
    Inches,
    Yards,
    Feet,
    Radians,
    Degrees,
    Hectares,
}

impl DistanceUnit {
    pub const ALL: [DistanceUnit; 13] = [
        DistanceUnit::Meters,
        DistanceUnit::Millimeters,
        DistanceUnit::Centimeters,
        DistanceUnit::Kilometers,
        DistanceUnit::Acres,
        DistanceUnit::Miles,
        DistanceUnit::NauticalMiles,
        DistanceUnit::Inches,
        DistanceUnit::Yards,
        DistanceUnit::Feet,
        DistanceUnit::Radians,
        DistanceUnit::Degrees,
        DistanceUnit::Hectares,
    ];

    /// Lowercase name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "meters",
            DistanceUnit::Millimeters => "millimeters",
            DistanceUnit::Centimeters => "centimeters",
            DistanceUnit::Kilometers => "kilometers",
            DistanceUnit::Acres => "acres",
            DistanceUnit::Miles => "miles",
            DistanceUnit::NauticalMiles => "nauticalmiles",
            DistanceUnit::Inches => "inches",
            DistanceUnit::Yards => "yards",
            DistanceUnit::Feet => "feet",
            DistanceUnit::Radians => "radians",
            DistanceUnit::Degrees => "degrees",
            DistanceUnit::Hectares => "hectares",
        }
    }

    /// How many of this unit make up one radian of arc on the earth's surface.
    ///
    /// Returns `None` for area units.
    pub fn per_radian(&self) -> Option<f64> {
        let r = EARTH_RADIUS_METERS;
        match self {
            DistanceUnit::Meters => Some(r),
            DistanceUnit::Millimeters => Some(r * 1000.0),
            DistanceUnit::Centimeters => Some(r * 100.0),
            DistanceUnit::Kilometers => Some(r / 1000.0),
            DistanceUnit::Miles => Some(r / 1609.344),
            DistanceUnit::NauticalMiles => Some(r / 1852.0),
            DistanceUnit::Inches => Some(r * 39.370),
            DistanceUnit::Yards => Some(r * 1.0936),
            DistanceUnit::Feet => Some(r * 3.28084),
            DistanceUnit::Radians => Some(1.0),
            DistanceUnit::Degrees => Some(180.0 / std::f64::consts::PI),
            DistanceUnit::Acres | DistanceUnit::Hectares => None,
        }
    }

    /// True if this unit can express a length.
    pub fn is_length(&self) -> bool {
        self.per_radian().is_some()
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        DistanceUnit::ALL
            .into_iter()
            .find(|u| u.as_str() == lower)
            .ok_or_else(|| DomainError::UnknownDistanceUnit(s.to_string()))
    }
}
