//! Tracked and default city models.

use chrono::{DateTime, Utc};
use thiserror::Error;

use skycast_core::{
    CityName, CityNameError, Coordinates, CoordinatesError, DefaultCityId, TrackedCityId,
};

/// Rejected input for a new city.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Name(#[from] CityNameError),
    #[error(transparent)]
    Coordinates(#[from] CoordinatesError),
}

/// A temperature observation and the time it was fetched.
///
/// Temperature and timestamp only ever exist together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
    /// When the value was fetched.
    pub updated_at: DateTime<Utc>,
}

impl WeatherReading {
    /// Reading stamped with the current time.
    #[must_use]
    pub fn now(temperature: f64) -> Self {
        Self {
            temperature,
            updated_at: Utc::now(),
        }
    }
}

/// A city the user monitors.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedCity {
    pub id: TrackedCityId,
    pub name: CityName,
    pub coordinates: Coordinates,
    /// Last successful reading, `None` until the first refresh succeeds.
    pub weather: Option<WeatherReading>,
}

/// Seed reference data copied into the tracked list on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultCity {
    pub id: DefaultCityId,
    pub name: CityName,
    pub coordinates: Coordinates,
}

/// Validated input for creating a city row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCity {
    pub name: CityName,
    pub coordinates: Coordinates,
}

impl NewCity {
    /// Validate raw user input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is blank or too long, or the
    /// coordinates are out of range.
    pub fn parse(name: &str, latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            name: CityName::parse(name)?,
            coordinates: Coordinates::new(latitude, longitude)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_city_parse_valid() {
        let city = NewCity::parse(" Lyon ", 45.76, 4.84);
        assert!(matches!(city, Ok(ref c) if c.name.as_str() == "Lyon"));
    }

    #[test]
    fn test_new_city_parse_rejects_name() {
        assert_eq!(
            NewCity::parse("", 45.76, 4.84),
            Err(ValidationError::Name(CityNameError::Empty))
        );
    }

    #[test]
    fn test_new_city_parse_rejects_coordinates() {
        assert_eq!(
            NewCity::parse("Nowhere", 45.0, 200.0),
            Err(ValidationError::Coordinates(
                CoordinatesError::LongitudeOutOfRange(200.0)
            ))
        );
    }

    #[test]
    fn test_validation_error_message_is_transparent() {
        let err = NewCity::parse("North", 95.0, 0.0).unwrap_err();
        assert_eq!(err.to_string(), "latitude must be between -90 and 90 (got 95)");
    }
}
