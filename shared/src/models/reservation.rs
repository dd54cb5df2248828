//! Reservation Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reservation lifecycle status
///
/// Numeric codes are part of the external contract (status filters,
/// `status_value` in views, SMALLINT column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[repr(i16)]
pub enum ReservationStatus {
    Cancelled = 0,
    Pending = 1,
    Confirmed = 2,
    Completed = 3,
    Rejected = 4,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 5] = [
        Self::Cancelled,
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Rejected,
    ];

    #[inline]
    pub const fn code(&self) -> i16 {
        *self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Human readable label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cancelled => "Cancelled",
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
        }
    }

    /// Completed, Rejected and Cancelled accept no further transition
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }

    /// Only Cancelled and Rejected rows may hold a `cancel_reason`
    pub const fn carries_reason(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Rejected)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for status tokens that are neither a known code nor a known name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid reservation status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for ReservationStatus {
    type Err = InvalidStatus;

    /// Accepts the numeric code (`"2"`) or the name in any case (`"confirmed"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Ok(code) = token.parse::<i16>() {
            return Self::from_code(code).ok_or_else(|| InvalidStatus(token.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|st| st.label().eq_ignore_ascii_case(token))
            .ok_or_else(|| InvalidStatus(token.to_string()))
    }
}

/// Reservation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub restaurant_id: i64,
    pub table_id: i64,
    /// Diner who booked
    pub user_id: i64,
    /// Epoch milliseconds
    pub reservation_time: i64,
    /// Booked duration in hours
    pub duration_units: i32,
    pub party_size: i32,
    pub remarks: Option<String>,
    pub status: ReservationStatus,
    /// Cancel reason, or reject reason when status is Rejected
    pub cancel_reason: Option<String>,
    pub review_ref: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    pub fn reject_reason(&self) -> Option<&str> {
        match self.status {
            ReservationStatus::Rejected => self.cancel_reason.as_deref(),
            _ => None,
        }
    }

    pub fn is_reviewed(&self) -> bool {
        self.review_ref.is_some()
    }
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    #[serde(alias = "restaurantId")]
    pub restaurant_id: i64,
    #[serde(alias = "tableId")]
    pub table_id: i64,
    #[serde(alias = "reservationTime")]
    pub reservation_time: i64,
    #[serde(alias = "durationUnits")]
    pub duration_units: i32,
    #[serde(alias = "partySize")]
    pub party_size: i32,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Reservation enriched for listing and mutation responses
///
/// Enrichment fields are `None` when the directory no longer knows the
/// restaurant or table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationView {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub restaurant_name: Option<String>,
    pub table_type: Option<String>,
    pub status_value: i16,
    pub status_text: String,
    pub reject_reason: Option<String>,
    pub reviewed: bool,
}

impl ReservationView {
    pub fn new(
        reservation: Reservation,
        restaurant_name: Option<String>,
        table_type: Option<String>,
    ) -> Self {
        Self {
            status_value: reservation.status.code(),
            status_text: reservation.status.label().to_string(),
            reject_reason: reservation.reject_reason().map(str::to_string),
            reviewed: reservation.is_reviewed(),
            restaurant_name,
            table_type,
            reservation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: ReservationStatus) -> Reservation {
        Reservation {
            id: 1,
            restaurant_id: 10,
            table_id: 100,
            user_id: 7,
            reservation_time: 1_800_000_000_000,
            duration_units: 2,
            party_size: 4,
            remarks: None,
            status,
            cancel_reason: Some("kitchen closed".to_string()),
            review_ref: None,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ReservationStatus::Cancelled.code(), 0);
        assert_eq!(ReservationStatus::Pending.code(), 1);
        assert_eq!(ReservationStatus::Confirmed.code(), 2);
        assert_eq!(ReservationStatus::Completed.code(), 3);
        assert_eq!(ReservationStatus::Rejected.code(), 4);
        assert_eq!(ReservationStatus::from_code(5), None);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("2".parse(), Ok(ReservationStatus::Confirmed));
        assert_eq!(" pending ".parse(), Ok(ReservationStatus::Pending));
        assert_eq!("REJECTED".parse(), Ok(ReservationStatus::Rejected));
        assert!("9".parse::<ReservationStatus>().is_err());
        assert!("seated".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ReservationStatus::Pending.is_terminal());
        assert!(!ReservationStatus::Confirmed.is_terminal());
        assert!(ReservationStatus::Completed.is_terminal());
        assert!(ReservationStatus::Rejected.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_only_cancel_and_reject_carry_reason() {
        let carrying: Vec<_> = ReservationStatus::ALL
            .into_iter()
            .filter(ReservationStatus::carries_reason)
            .collect();
        assert_eq!(
            carrying,
            vec![ReservationStatus::Cancelled, ReservationStatus::Rejected]
        );
    }

    #[test]
    fn test_create_accepts_camel_case() {
        let dto: ReservationCreate = serde_json::from_str(
            r#"{"restaurantId":1,"tableId":10,"reservationTime":5,"durationUnits":2,"partySize":4}"#,
        )
        .unwrap();
        assert_eq!(dto.restaurant_id, 1);
        assert_eq!(dto.table_id, 10);
        assert_eq!(dto.reservation_time, 5);
        assert_eq!(dto.duration_units, 2);
        assert_eq!(dto.party_size, 4);
        assert!(dto.remarks.is_none());

        let snake: ReservationCreate = serde_json::from_str(
            r#"{"restaurant_id":1,"table_id":10,"reservation_time":5,"duration_units":2,"party_size":4,"remarks":"window"}"#,
        )
        .unwrap();
        assert_eq!(snake.remarks.as_deref(), Some("window"));
    }

    #[test]
    fn test_reject_reason_only_when_rejected() {
        assert_eq!(
            sample(ReservationStatus::Rejected).reject_reason(),
            Some("kitchen closed")
        );
        assert_eq!(sample(ReservationStatus::Cancelled).reject_reason(), None);
    }

    #[test]
    fn test_view_serializes_flat() {
        let mut r = sample(ReservationStatus::Completed);
        r.review_ref = Some("rv-1".to_string());
        let view = ReservationView::new(r, Some("Blue Door".to_string()), None);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["status_value"], 3);
        assert_eq!(json["status_text"], "Completed");
        assert_eq!(json["restaurant_name"], "Blue Door");
        assert!(json["table_type"].is_null());
        assert_eq!(json["reviewed"], true);
    }
}
