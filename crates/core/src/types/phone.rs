//! Phone number type.
//!
//! Validates Indian mobile numbers, the only numbers the shipping
//! carriers and the payment gateway accept.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits, separators, or a +91 prefix.
    #[error("phone number contains invalid characters")]
    InvalidCharacters,
    /// The number is not 10 digits after normalization.
    #[error("phone number must be 10 digits, got {got}")]
    WrongLength {
        /// Number of digits after stripping prefix and separators.
        got: usize,
    },
    /// Indian mobile numbers start with 6-9.
    #[error("phone number must start with 6, 7, 8, or 9")]
    InvalidLeadingDigit,
}

/// A validated Indian mobile number, stored in normalized 10-digit form.
///
/// Accepts an optional `+91` or `0` prefix and ignores spaces and dashes.
///
/// ## Examples
///
/// ```
/// use meridian_core::Phone;
///
/// assert_eq!(Phone::parse("+91 98765 43210").unwrap().as_str(), "9876543210");
/// assert_eq!(Phone::parse("098765-43210").unwrap().as_str(), "9876543210");
///
/// assert!(Phone::parse("12345").is_err());      // too short
/// assert!(Phone::parse("1234567890").is_err()); // bad leading digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string, normalizing to 10 digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits/spaces/dashes (plus an optional `+91` or `0` prefix),
    /// is not 10 digits long after normalization, or does not start with
    /// a digit in `6..=9`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let compact: String = s.chars().filter(|c| !matches!(c, ' ' | '-')).collect();

        if compact.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = compact
            .strip_prefix("+91")
            .or_else(|| compact.strip_prefix("0"))
            .unwrap_or(&compact);

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacters);
        }

        if digits.len() != 10 {
            return Err(PhoneError::WrongLength { got: digits.len() });
        }

        if !digits.starts_with(['6', '7', '8', '9']) {
            return Err(PhoneError::InvalidLeadingDigit);
        }

        Ok(Self(digits.to_owned()))
    }

    /// Returns the normalized 10-digit number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number with the `+91` country prefix.
    #[must_use]
    pub fn with_country_code(&self) -> String {
        format!("+91{}", self.0)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(Phone::parse("9876543210").expect("valid").as_str(), "9876543210");
    }

    #[test]
    fn test_parse_with_country_prefix() {
        assert_eq!(
            Phone::parse("+919876543210").expect("valid").as_str(),
            "9876543210"
        );
    }

    #[test]
    fn test_parse_with_zero_prefix_and_separators() {
        assert_eq!(
            Phone::parse("0 98765-43210").expect("valid").as_str(),
            "9876543210"
        );
    }

    #[test]
    fn test_parse_rejects_short() {
        assert!(matches!(
            Phone::parse("98765"),
            Err(PhoneError::WrongLength { got: 5 })
        ));
    }

    #[test]
    fn test_parse_rejects_long() {
        assert!(matches!(
            Phone::parse("98765432101"),
            Err(PhoneError::WrongLength { got: 11 })
        ));
    }

    #[test]
    fn test_parse_rejects_leading_digit() {
        assert!(matches!(
            Phone::parse("1234567890"),
            Err(PhoneError::InvalidLeadingDigit)
        ));
    }

    #[test]
    fn test_parse_rejects_letters() {
        assert!(matches!(
            Phone::parse("98765abcde"),
            Err(PhoneError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(Phone::parse(" - "), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_with_country_code() {
        let phone = Phone::parse("9876543210").expect("valid");
        assert_eq!(phone.with_country_code(), "+919876543210");
    }
}
