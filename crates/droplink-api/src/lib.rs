//! HTTP surface for droplink: handlers, state, and application setup.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

pub use error::ErrorResponse;
pub use state::AppState;
