//! Shared types for the reservation platform
//!
//! Common types used by the reservation server and its clients: error
//! codes and response envelopes, domain models, pagination.

pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

pub use error::{ApiResponse, AppError, ErrorCode};
pub use pagination::PaginatedResponse;
