//! Store error types.

use std::path::PathBuf;

use crate::geometry::GeometryError;
use crate::planner::NetworkError;

/// Errors that can occur when loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote source returned an error status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Local file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Source content is not the expected JSON
    #[error("JSON parse error in {location}: {message}")]
    Json { location: String, message: String },

    /// Source location is unusable
    #[error("invalid data source: {0}")]
    InvalidSource(String),

    /// Loaded records are inconsistent
    #[error("invalid snapshot: {0}")]
    Network(#[from] NetworkError),
}

/// Errors from querying a loaded store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Latitude or longitude out of range
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Result count out of range
    #[error("\"count\" must be between 1 and {max}, got {count}")]
    CountOutOfRange { count: usize, max: usize },

    /// Distances cannot be measured in the requested unit
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DistanceUnit;

    #[test]
    fn error_display() {
        let err = StoreError::Status {
            url: "https://example.com/stops.json".into(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "https://example.com/stops.json returned status 404"
        );

        let err = StoreError::Io {
            path: PathBuf::from("/data/stops.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to read /data/stops.json: not found");

        let err = QueryError::CountOutOfRange { count: 0, max: 100 };
        assert_eq!(err.to_string(), "\"count\" must be between 1 and 100, got 0");

        let err = QueryError::from(GeometryError::NotALengthUnit(DistanceUnit::Acres));
        assert_eq!(err.to_string(), "acres is not a unit of length");
    }
}
