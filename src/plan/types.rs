//! Core types shared by the plan model
//!
//! This module contains the validation trait and the name and key
//! rules every plan entity is checked against.

#![allow(clippy::must_use_candidate)]

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of plan, stage and job names.
pub const MAX_NAME_LEN: usize = 100;

static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9]*$").expect("key pattern compiles"));

/// Trait for types that can be validated
#[allow(clippy::missing_errors_doc)]
pub trait Validate {
    /// Type of validation error
    type Error;

    /// Validates this type
    fn validate(&self) -> std::result::Result<(), Self::Error>;
}

/// Checks that a display name is present and not longer than [`MAX_NAME_LEN`].
#[allow(clippy::missing_errors_doc)]
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN, len });
    }
    Ok(())
}

/// Checks that a project, plan or job key is uppercase alphanumeric and
/// starts with a letter.
#[allow(clippy::missing_errors_doc)]
pub fn validate_key(key: &str) -> Result<(), ValidationError> {
    if KEY_PATTERN.is_match(key) {
        Ok(())
    } else {
        Err(ValidationError::InvalidKey {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Integrity").is_ok());
        assert_eq!(validate_name("  "), Err(ValidationError::EmptyName));
        assert!(matches!(
            validate_name(&"a".repeat(101)),
            Err(ValidationError::NameTooLong { max: 100, len: 101 })
        ));
    }

    #[test]
    fn test_validate_name_counts_characters() {
        // 100 characters, 200 bytes
        assert!(validate_name(&"ü".repeat(100)).is_ok());
        assert!(matches!(
            validate_name(&"ü".repeat(101)),
            Err(ValidationError::NameTooLong { max: 100, len: 101 })
        ));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("GTN").is_ok());
        assert!(validate_key("FMY07201").is_ok());
        assert!(validate_key("gtn").is_err());
        assert!(validate_key("7GTN").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("G-TN").is_err());
    }
}
