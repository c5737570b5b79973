//! API Key domain
//!
//! Key records, ownership, masking for display and usage accounting.

mod entity;
mod masking;
mod repository;
mod usage;
mod validation;

pub use entity::{ApiKey, ApiKeyId, ApiKeyParts, ApiKeyPatch, KeyType, OwnerId};
pub use masking::{display_parts, mask_token, masked_from_parts, FULLY_MASKED, VISIBLE_CHARS};
pub use repository::{sort_newest_first, ApiKeyRepository};
pub use usage::{usage_percent, UsageSummary};
pub use validation::{
    validate_limit, validate_name, validate_owner, ApiKeyValidationError, MAX_LIMIT,
    MAX_NAME_LENGTH, MAX_OWNER_LENGTH,
};

#[cfg(test)]
pub use repository::mock;
