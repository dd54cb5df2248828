//! Data models
//!
//! Shared between the reservation server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64`; all timestamps are epoch milliseconds.

pub mod reservation;
pub mod restaurant;
pub mod role;
pub mod staff;

// Re-exports
pub use reservation::*;
pub use restaurant::*;
pub use role::*;
pub use staff::*;
