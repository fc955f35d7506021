//! Web layer.
//!
//! Each route is an independent relay: read parameters, make one upstream
//! call, format the result.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, StartupError};
pub use templates::*;
