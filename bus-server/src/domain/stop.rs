//! Bus stop types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// Identity of a bus stop.
///
/// Stop ids are positive integers, stable across snapshots.
///
/// # Examples
///
/// ```
/// use bus_server::domain::StopId;
///
/// let id = StopId::parse("42").unwrap();
/// assert_eq!(id.get(), 42);
///
/// // Zero and non-numeric ids are rejected
/// assert!(StopId::parse("0").is_err());
/// assert!(StopId::parse("abc").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StopId(u32);

impl StopId {
    /// Wrap a raw id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Parse a stop id from a string.
    ///
    /// The input must be a decimal integer greater than or equal to 1.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        let id: u32 = s.trim().parse().map_err(|_| InvalidStopId {
            reason: "must be a number",
        })?;

        Self::try_from(id)
    }

    /// Returns the raw numeric id.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for StopId {
    type Error = InvalidStopId;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        if id == 0 {
            return Err(InvalidStopId {
                reason: "must be greater than or equal to 1",
            });
        }
        Ok(Self(id))
    }
}

impl From<StopId> for u32 {
    fn from(id: StopId) -> Self {
        id.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label carried in English and Myanmar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub mm: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, mm: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            mm: mm.into(),
        }
    }

    /// Case-insensitive substring match against either language.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.en.to_lowercase().contains(&needle) || self.mm.to_lowercase().contains(&needle)
    }
}

/// A geographic position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True if latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// The place a stop represents, independent of its direction of travel.
///
/// Two stop records with the same English name, road and township are
/// directional siblings of one another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceKey {
    pub name: String,
    pub road: String,
    pub township: String,
}

/// A physical boarding/alighting location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: LocalizedText,
    #[serde(default)]
    pub road: LocalizedText,
    #[serde(default)]
    pub township: LocalizedText,
    pub lat: f64,
    pub lng: f64,
}

impl Stop {
    /// Returns the stop's position.
    pub fn position(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Returns the key shared by this stop and its directional siblings.
    pub fn place_key(&self) -> PlaceKey {
        PlaceKey {
            name: self.name.en.clone(),
            road: self.road.en.clone(),
            township: self.township.en.clone(),
        }
    }
}
