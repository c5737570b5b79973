//! API Key validation utilities

use thiserror::Error;

/// Errors that can occur while validating API key fields
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("API key ID is not a valid UUID: '{0}'")]
    InvalidId(String),

    #[error("API key name cannot be empty")]
    EmptyName,

    #[error("API key name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("API key type must be one of 'dev' or 'prod', got '{0}'")]
    InvalidType(String),

    #[error("Usage limit must be a positive integer")]
    NonPositiveLimit,

    #[error("Usage limit exceeds maximum of {0}")]
    LimitTooLarge(u64),

    #[error("Owner identity cannot be empty")]
    EmptyOwner,

    #[error("Owner identity exceeds maximum length of {0} characters")]
    OwnerTooLong(usize),
}

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_OWNER_LENGTH: usize = 255;

/// Largest limit the store can represent (BIGINT column)
pub const MAX_LIMIT: u64 = i64::MAX as u64;

/// Validate a user-chosen key name and return it trimmed
pub fn validate_name(name: &str) -> Result<String, ApiKeyValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiKeyValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(trimmed.to_string())
}

/// Validate a monthly usage limit
///
/// Accepts a signed value so that negative input from JSON bodies is
/// reported as a validation error instead of a deserialization failure.
pub fn validate_limit(limit: i64) -> Result<u64, ApiKeyValidationError> {
    if limit <= 0 {
        return Err(ApiKeyValidationError::NonPositiveLimit);
    }

    let limit = limit as u64;

    if limit > MAX_LIMIT {
        return Err(ApiKeyValidationError::LimitTooLarge(MAX_LIMIT));
    }

    Ok(limit)
}

/// Validate an owner principal identifier
pub fn validate_owner(owner: &str) -> Result<(), ApiKeyValidationError> {
    if owner.trim().is_empty() {
        return Err(ApiKeyValidationError::EmptyOwner);
    }

    if owner.len() > MAX_OWNER_LENGTH {
        return Err(ApiKeyValidationError::OwnerTooLong(MAX_OWNER_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(validate_name("Test").unwrap(), "Test");
        assert_eq!(validate_name("  Production key  ").unwrap(), "Production key");
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_name(""), Err(ApiKeyValidationError::EmptyName));
        assert_eq!(validate_name("   "), Err(ApiKeyValidationError::EmptyName));
    }

    #[test]
    fn test_name_too_long() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(
            validate_name(&long),
            Err(ApiKeyValidationError::NameTooLong(MAX_NAME_LENGTH))
        );
    }

    #[test]
    fn test_limits() {
        assert_eq!(validate_limit(1).unwrap(), 1);
        assert_eq!(validate_limit(1000).unwrap(), 1000);
        assert_eq!(validate_limit(0), Err(ApiKeyValidationError::NonPositiveLimit));
        assert_eq!(validate_limit(-5), Err(ApiKeyValidationError::NonPositiveLimit));
        assert_eq!(validate_limit(i64::MAX).unwrap(), MAX_LIMIT);
    }

    #[test]
    fn test_owner() {
        assert!(validate_owner("5f0c5e1e-8d7a-4a4e-9b1e-0c6f3f0f2a11").is_ok());
        assert_eq!(validate_owner(""), Err(ApiKeyValidationError::EmptyOwner));
        assert_eq!(validate_owner("  "), Err(ApiKeyValidationError::EmptyOwner));

        let long = "o".repeat(MAX_OWNER_LENGTH + 1);
        assert_eq!(
            validate_owner(&long),
            Err(ApiKeyValidationError::OwnerTooLong(MAX_OWNER_LENGTH))
        );
    }
}
