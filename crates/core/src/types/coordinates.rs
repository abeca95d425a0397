//! Geographic coordinate pair.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing [`Coordinates`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoordinatesError {
    /// Latitude or longitude is NaN or infinite.
    #[error("{axis} must be a finite number")]
    NotFinite {
        /// Which axis was rejected.
        axis: &'static str,
    },
    /// Latitude is outside [-90, 90].
    #[error("latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),
    /// Longitude is outside [-180, 180].
    #[error("longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),
}

/// A validated WGS84 latitude/longitude pair in decimal degrees.
///
/// ## Constraints
///
/// - Both values are finite
/// - Latitude is within [-90, 90]
/// - Longitude is within [-180, 180]
///
/// ## Examples
///
/// ```
/// use skycast_core::Coordinates;
///
/// assert!(Coordinates::new(45.76, 4.84).is_ok());
/// assert!(Coordinates::new(-90.0, 180.0).is_ok());
///
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// assert!(Coordinates::new(0.0, -180.5).is_err());
/// assert!(Coordinates::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Smallest valid latitude.
    pub const MIN_LATITUDE: f64 = -90.0;
    /// Largest valid latitude.
    pub const MAX_LATITUDE: f64 = 90.0;
    /// Smallest valid longitude.
    pub const MIN_LONGITUDE: f64 = -180.0;
    /// Largest valid longitude.
    pub const MAX_LONGITUDE: f64 = 180.0;

    /// Validate and build a coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() {
            return Err(CoordinatesError::NotFinite { axis: "latitude" });
        }
        if !longitude.is_finite() {
            return Err(CoordinatesError::NotFinite { axis: "longitude" });
        }
        if !(Self::MIN_LATITUDE..=Self::MAX_LATITUDE).contains(&latitude) {
            return Err(CoordinatesError::LatitudeOutOfRange(latitude));
        }
        if !(Self::MIN_LONGITUDE..=Self::MAX_LONGITUDE).contains(&longitude) {
            return Err(CoordinatesError::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = CoordinatesError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}
