//! reservation-server: table reservation lifecycle service
//!
//! - Diners book tables and cancel their own bookings
//! - Managers and admins confirm, reject and complete bookings
//! - Approved staff act on the reservations of their manager's restaurants
//!
//! Every caller is resolved to an access scope before any read or write.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod reservation;
pub mod state;

pub use config::Config;
pub use error::{ReservationError, ReservationResult};
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
