//! API Key generation
//!
//! Generates opaque random tokens and the values stored in their place.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::api_key::display_parts;

/// Default number of random bytes per token (32 hex characters)
pub const DEFAULT_TOKEN_BYTES: usize = 16;

/// Result of generating a new API key
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full token (only shown once at creation)
    pub token: String,
    /// Hash of the token used for lookups
    pub hash: String,
    /// First characters of the token, kept for masked display
    pub prefix: String,
    /// Last characters of the token, kept for masked display
    pub suffix: String,
}

/// Generator for opaque API key tokens
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    token_bytes: usize,
}

impl ApiKeyGenerator {
    /// Create a new API key generator
    pub fn new() -> Self {
        Self {
            token_bytes: DEFAULT_TOKEN_BYTES,
        }
    }

    /// Set the number of random bytes; values below 8 are raised to 8
    pub fn with_token_bytes(mut self, bytes: usize) -> Self {
        self.token_bytes = bytes.max(8);
        self
    }

    /// Generate a new token from the OS-seeded CSPRNG
    pub fn generate(&self) -> GeneratedApiKey {
        let mut random_bytes = vec![0u8; self.token_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        self.from_token(hex::encode(random_bytes))
    }

    /// Derive the stored values for a known token
    pub fn from_token(&self, token: impl Into<String>) -> GeneratedApiKey {
        let token = token.into();
        let hash = hash_token(&token);
        let (prefix, suffix) = display_parts(&token);

        GeneratedApiKey {
            token,
            hash,
            prefix,
            suffix,
        }
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a presented token for storage and lookup
///
/// Exact byte comparison: no trimming or case folding is applied.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let result = hasher.finalize();
    format!("sha256${}", URL_SAFE_NO_PAD.encode(result))
}

/// Short, loggable prefix of a token
pub fn log_prefix(token: &str) -> &str {
    match token.char_indices().nth(4) {
        Some((idx, _)) => &token[..idx],
        None => "",
    }
}
