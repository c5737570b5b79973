//! API middleware components

pub mod auth;
pub mod logging;
pub mod metrics;
pub mod owner_auth;
pub mod security;

pub use auth::{RequireApiKey, API_KEY_HEADER};
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use owner_auth::RequireOwner;
pub use security::{request_guard_middleware, security_headers_middleware};
