pub mod job_handlers;
pub mod resume_handlers;
pub mod system_handlers;

pub use job_handlers::*;
pub use resume_handlers::*;
pub use system_handlers::*;

use crate::web::types::{api_error, ApiError};
use rocket::http::Status;
use tracing::error;

pub(crate) fn storage_error(e: anyhow::Error) -> ApiError {
    error!("Storage failure: {:#}", e);
    api_error(
        Status::InternalServerError,
        "Failed to access storage",
        "STORAGE_ERROR",
        &["Try again in a few moments", "Check the database path in config.yaml"],
    )
}
