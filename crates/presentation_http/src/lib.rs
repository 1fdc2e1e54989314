//! Campus weather HTTP presentation layer
//!
//! JSON endpoints for the site (`/`), the public API (`/api`) and health
//! probes.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use server::serve_until;
pub use state::AppState;
