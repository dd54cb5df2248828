//! Staff Model

use serde::{Deserialize, Serialize};

/// Staff assignment status, set by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[repr(i16)]
pub enum StaffStatus {
    PendingReview = 0,
    Approved = 1,
}

/// Staff assignment linking a staff user to a manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffMember {
    pub id: i64,
    /// Staff user id (the identity carried in the token)
    pub user_id: i64,
    pub manager_id: i64,
    pub status: StaffStatus,
}

impl StaffMember {
    pub fn is_approved(&self) -> bool {
        self.status == StaffStatus::Approved
    }
}
