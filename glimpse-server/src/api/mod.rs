pub mod engagement;
pub mod error;
pub mod jobs;

pub use error::{ApiError, ApiResult};
