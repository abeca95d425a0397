//! City display name.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CityName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CityNameError {
    /// The input is empty or only whitespace.
    #[error("city name cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("city name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A trimmed, non-empty city name.
///
/// ## Examples
///
/// ```
/// use skycast_core::CityName;
///
/// assert_eq!(CityName::parse("  Lyon ").unwrap().as_str(), "Lyon");
/// assert!(CityName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CityName(String);

impl CityName {
    /// Maximum length of a city name, in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a `CityName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, CityNameError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(CityNameError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(CityNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CityName {
    type Err = CityNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CityName {
    type Error = CityNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CityName> for String {
    fn from(name: CityName) -> Self {
        name.0
    }
}

impl AsRef<str> for CityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
