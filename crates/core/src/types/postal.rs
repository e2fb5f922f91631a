//! Postal (PIN) code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PostalCodeError {
    /// The input string is empty.
    #[error("postal code cannot be empty")]
    Empty,
    /// The code is not exactly 6 digits.
    #[error("postal code must be 6 digits, got {got}")]
    WrongLength {
        /// Number of characters after trimming.
        got: usize,
    },
    /// The code contains non-digit characters.
    #[error("postal code must contain only digits")]
    InvalidCharacters,
    /// PIN codes never start with 0.
    #[error("postal code cannot start with 0")]
    LeadingZero,
}

/// A validated Indian postal (PIN) code: six digits, no leading zero.
///
/// ## Examples
///
/// ```
/// use meridian_core::PostalCode;
///
/// assert!(PostalCode::parse("560001").is_ok());
/// assert!(PostalCode::parse("056001").is_err()); // leading zero
/// assert!(PostalCode::parse("5600").is_err());   // too short
/// assert!(PostalCode::parse("56000A").is_err()); // non-digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse a `PostalCode` from a string.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, not 6 characters,
    /// contains non-digits, or starts with 0.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(PostalCodeError::Empty);
        }

        if trimmed.len() != 6 {
            return Err(PostalCodeError::WrongLength { got: trimmed.len() });
        }

        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(PostalCodeError::InvalidCharacters);
        }

        if trimmed.starts_with('0') {
            return Err(PostalCodeError::LeadingZero);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the postal code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(PostalCode::parse("400001").expect("valid").as_str(), "400001");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(PostalCode::parse(" 110001 ").expect("valid").as_str(), "110001");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(PostalCode::parse("  "), Err(PostalCodeError::Empty)));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            PostalCode::parse("1234"),
            Err(PostalCodeError::WrongLength { got: 4 })
        ));
        assert!(matches!(
            PostalCode::parse("1234567"),
            Err(PostalCodeError::WrongLength { got: 7 })
        ));
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        assert!(matches!(
            PostalCode::parse("12345A"),
            Err(PostalCodeError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_parse_rejects_leading_zero() {
        assert!(matches!(
            PostalCode::parse("012345"),
            Err(PostalCodeError::LeadingZero)
        ));
    }
}
