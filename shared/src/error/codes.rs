//! Unified error codes for the reservation platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Restaurant / table directory errors
//! - 4xxx: Reservation errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Staff assignment has not been approved by a manager
    StaffNotApproved = 2101,
    /// Restaurant is outside the caller's scope
    RestaurantOutOfScope = 2102,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant does not exist
    RestaurantNotFound = 3001,
    /// Restaurant is not operating
    RestaurantNotOperating = 3002,
    /// Table does not exist
    TableNotFound = 3101,
    /// Table belongs to another restaurant
    TableRestaurantMismatch = 3102,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Status transition is not allowed from the current status
    InvalidStateTransition = 4002,
    /// Reservation time lies in the past
    ReservationTimeInPast = 4003,
    /// Duration must be positive
    InvalidDuration = 4004,
    /// Party size must be positive
    InvalidPartySize = 4005,
    /// Reject reason is required
    RejectReasonRequired = 4006,
    /// Review already attached
    ReviewAlreadyAttached = 4007,
    /// Reservation cannot be reviewed in its current status
    ReviewNotAllowed = 4008,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::StaffNotApproved => "Staff assignment has not been approved yet",
            ErrorCode::RestaurantOutOfScope => "No permission to access this restaurant",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant does not exist",
            ErrorCode::RestaurantNotOperating => {
                "This restaurant is not available for reservations"
            }
            ErrorCode::TableNotFound => "Table does not exist",
            ErrorCode::TableRestaurantMismatch => "Table does not belong to this restaurant",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation does not exist",
            ErrorCode::InvalidStateTransition => "Status transition is not allowed",
            ErrorCode::ReservationTimeInPast => "Cannot reserve past time",
            ErrorCode::InvalidDuration => "Reservation duration must be greater than 0",
            ErrorCode::InvalidPartySize => "Number of people must be greater than 0",
            ErrorCode::RejectReasonRequired => "Rejection reason cannot be empty",
            ErrorCode::ReviewAlreadyAttached => "Reservation has already been reviewed",
            ErrorCode::ReviewNotAllowed => "Only completed reservations can be reviewed",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2101 => Ok(ErrorCode::StaffNotApproved),
            2102 => Ok(ErrorCode::RestaurantOutOfScope),

            // Restaurant
            3001 => Ok(ErrorCode::RestaurantNotFound),
            3002 => Ok(ErrorCode::RestaurantNotOperating),
            3101 => Ok(ErrorCode::TableNotFound),
            3102 => Ok(ErrorCode::TableRestaurantMismatch),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::InvalidStateTransition),
            4003 => Ok(ErrorCode::ReservationTimeInPast),
            4004 => Ok(ErrorCode::InvalidDuration),
            4005 => Ok(ErrorCode::InvalidPartySize),
            4006 => Ok(ErrorCode::RejectReasonRequired),
            4007 => Ok(ErrorCode::ReviewAlreadyAttached),
            4008 => Ok(ErrorCode::ReviewNotAllowed),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
