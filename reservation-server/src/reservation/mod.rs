//! Reservation lifecycle engine
//!
//! - [`validator`] - booking checks against the restaurant directory
//! - [`state_machine`] - status transitions and who may trigger them
//! - [`scope`] - caller to visible-restaurant resolution
//! - [`listing`] - paginated, enriched reads
//! - [`service`] - facade used by the HTTP layer

pub mod listing;
pub mod scope;
pub mod service;
pub mod state_machine;
pub mod validator;

pub use listing::{ListQuery, ListingService, PageRequest};
pub use scope::{Scope, ScopeResolver};
pub use service::ReservationService;
pub use state_machine::{StateMachine, Transition};
pub use validator::{AvailabilityValidator, BookingRequest, Rejection};
