//! Common types used across Posada components

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for room number validation
#[derive(Debug, Error)]
pub enum RoomNumberError {
    #[error("room number cannot be empty")]
    Empty,
    #[error("room number too long (max 10 characters)")]
    TooLong,
    #[error("room number contains invalid characters. Only alphanumeric characters and hyphens are allowed")]
    InvalidCharacters,
}

/// A validated human-readable room number
///
/// Room numbers must:
/// - Be between 1 and 10 characters long
/// - Only contain alphanumeric characters (a-z, A-Z, 0-9) and hyphens (-)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomNumber(String);

impl RoomNumber {
    /// Create a new validated room number
    pub fn new(number: impl Into<String>) -> Result<Self, RoomNumberError> {
        let number = number.into();
        Self::validate(&number)?;
        Ok(Self(number))
    }

    fn validate(number: &str) -> Result<(), RoomNumberError> {
        if number.is_empty() {
            return Err(RoomNumberError::Empty);
        }

        if number.len() > 10 {
            return Err(RoomNumberError::TooLong);
        }

        if !number.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(RoomNumberError::InvalidCharacters);
        }

        Ok(())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomNumber {
    type Err = RoomNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RoomNumber {
    type Error = RoomNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomNumber> for String {
    fn from(number: RoomNumber) -> Self {
        number.0
    }
}

impl AsRef<str> for RoomNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error type for license plate validation
#[derive(Debug, Error)]
pub enum LicensePlateError {
    #[error("license plate cannot be empty")]
    Empty,
    #[error("license plate too long (max 12 characters)")]
    TooLong,
    #[error("license plate contains invalid characters. Only alphanumeric characters and hyphens are allowed")]
    InvalidCharacters,
}

/// A vehicle license plate, normalized to uppercase on construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Create a new validated plate. Input is trimmed and uppercased.
    pub fn new(plate: impl Into<String>) -> Result<Self, LicensePlateError> {
        let plate = plate.into().trim().to_ascii_uppercase();
        Self::validate(&plate)?;
        Ok(Self(plate))
    }

    fn validate(plate: &str) -> Result<(), LicensePlateError> {
        if plate.is_empty() {
            return Err(LicensePlateError::Empty);
        }

        if plate.len() > 12 {
            return Err(LicensePlateError::TooLong);
        }

        if !plate.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(LicensePlateError::InvalidCharacters);
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LicensePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LicensePlate {
    type Err = LicensePlateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LicensePlate {
    type Error = LicensePlateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LicensePlate> for String {
    fn from(plate: LicensePlate) -> Self {
        plate.0
    }
}

impl AsRef<str> for LicensePlate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
