mod error;
mod handlers;
mod middleware;
mod router;
mod state;

pub use error::ApiError;
pub use router::{build_router, run_http_server};
pub use state::{ApiState, RegistrationService};

/// Request body ceiling; comfortably above a few thousand registrations.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;
