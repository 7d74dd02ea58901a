//! Validated email address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Reasons an email address string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    /// The string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The string exceeds the RFC 5321 length limit.
    #[error("email longer than {} characters", Email::MAX_LENGTH)]
    TooLong,
    /// The string has no `@`, or nothing on one side of it.
    #[error("email must be of the form local@domain")]
    Malformed,
}

/// A validated email address.
///
/// Validation is structural: the address must be non-empty, at most
/// [`Email::MAX_LENGTH`] characters, and have text on both sides of an `@`.
/// Deserialization runs the same validation, so an `Email` decoded from a
/// payload is always well-formed.
///
/// ```
/// use velvet_tamarind_core::Email;
///
/// let email = Email::parse("ayesha@example.com")?;
/// assert_eq!(email.as_str(), "ayesha@example.com");
/// assert!(Email::parse("not-an-email").is_err());
/// # Ok::<(), velvet_tamarind_core::EmailError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Email(String);

impl Email {
    /// Longest accepted address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and validate an address.
    ///
    /// # Errors
    ///
    /// Returns an error when the string is empty, longer than
    /// [`Self::MAX_LENGTH`], or not of the form `local@domain`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        validate(s)?;
        Ok(Self(s.to_owned()))
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(s: &str) -> Result<(), EmailError> {
    if s.is_empty() {
        return Err(EmailError::Empty);
    }
    if s.len() > Email::MAX_LENGTH {
        return Err(EmailError::TooLong);
    }
    match s.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(EmailError::Malformed),
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_addresses() {
        for ok in [
            "a@b.c",
            "user.name+tag@shop.example.com",
            "support@velvettamarind.shop",
        ] {
            assert!(Email::parse(ok).is_ok(), "{ok} should parse");
        }
    }

    #[test]
    fn test_rejects_structurally_invalid_addresses() {
        assert!(matches!(Email::parse(""), Err(EmailError::Empty)));
        assert!(matches!(
            Email::parse("no-at-sign"),
            Err(EmailError::Malformed)
        ));
        assert!(matches!(
            Email::parse("@missing-local"),
            Err(EmailError::Malformed)
        ));
        assert!(matches!(
            Email::parse("missing-domain@"),
            Err(EmailError::Malformed)
        ));
    }

    #[test]
    fn test_rejects_overlong_address() {
        let long = format!("{}@example.com", "a".repeat(Email::MAX_LENGTH));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong)));
    }

    #[test]
    fn test_deserialization_validates() {
        let email: Email = serde_json::from_str("\"rafiq@example.com\"").unwrap();
        assert_eq!(email.as_str(), "rafiq@example.com");
        assert!(serde_json::from_str::<Email>("\"rafiq\"").is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("rafiq@example.com").unwrap();
        assert_eq!(
            serde_json::to_string(&email).unwrap(),
            "\"rafiq@example.com\""
        );
    }

    #[test]
    fn test_from_str_and_display() {
        let email: Email = "rafiq@example.com".parse().unwrap();
        assert_eq!(email.to_string(), "rafiq@example.com");
    }
}
