//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller role as carried in the token (`role` claim)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Role {
    Admin = 0,
    Manager = 1,
    Diner = 2,
    Staff = 3,
}

impl Role {
    #[inline]
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Diner => "diner",
            Self::Staff => "staff",
        }
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

/// Error for role codes outside 0..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid role code: {0}")]
pub struct InvalidRole(pub u8);

impl TryFrom<u8> for Role {
    type Error = InvalidRole;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Admin),
            1 => Ok(Self::Manager),
            2 => Ok(Self::Diner),
            3 => Ok(Self::Staff),
            other => Err(InvalidRole(other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
