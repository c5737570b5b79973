//! API layer - HTTP endpoints and middleware

pub mod dashboard;
pub mod health;
pub mod middleware;
pub mod public;
pub mod router;
pub mod state;
pub mod types;

pub use middleware::{RequireApiKey, RequireOwner};
pub use router::{create_router, create_routes, RouterOptions};
pub use state::AppState;
