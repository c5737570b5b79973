//! Authentication infrastructure module
//!
//! JWT validation for dashboard owners.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService, MAX_TOKEN_HOURS};
