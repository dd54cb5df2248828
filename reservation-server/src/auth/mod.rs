//! Authentication and caller identity
//!
//! - [`JwtService`] - HS256 token issue and validation
//! - [`CurrentUser`] - identity decoded from the bearer token
//! - [`Actor`] - role-tagged identity the engine authorizes against

pub mod extractor;
pub mod jwt;

use std::fmt;

use shared::models::Role;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};

/// Caller identity from a validated token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("invalid subject: {}", claims.sub)))?;
        let role = Role::try_from(claims.role)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;
        Ok(Self { id, role })
    }
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::from_identity(self.id, self.role)
    }
}

/// Caller as the engine sees it
///
/// Each variant carries the identity its role is authorized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    Admin { user_id: i64 },
    /// Owner of restaurants (`restaurants.owner_id`)
    Manager { manager_id: i64 },
    Diner { user_id: i64 },
    /// Staff user id (`staff.user_id`)
    Staff { staff_id: i64 },
}

impl Actor {
    pub fn from_identity(id: i64, role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin { user_id: id },
            Role::Manager => Self::Manager { manager_id: id },
            Role::Diner => Self::Diner { user_id: id },
            Role::Staff => Self::Staff { staff_id: id },
        }
    }

    pub fn id(&self) -> i64 {
        match *self {
            Self::Admin { user_id } | Self::Diner { user_id } => user_id,
            Self::Manager { manager_id } => manager_id,
            Self::Staff { staff_id } => staff_id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Admin { .. } => Role::Admin,
            Self::Manager { .. } => Role::Manager,
            Self::Diner { .. } => Role::Diner,
            Self::Staff { .. } => Role::Staff,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, role: u8) -> Claims {
        Claims {
            sub: sub.to_string(),
            role,
            exp: 0,
            iat: 0,
            iss: String::new(),
            aud: String::new(),
        }
    }

    #[test]
    fn test_current_user_from_claims() {
        let user = CurrentUser::try_from(claims("42", 1)).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.actor(), Actor::Manager { manager_id: 42 });
    }

    #[test]
    fn test_bad_claims_are_rejected() {
        assert!(CurrentUser::try_from(claims("abc", 0)).is_err());
        assert!(CurrentUser::try_from(claims("1", 9)).is_err());
    }

    #[test]
    fn test_actor_identity() {
        for role in [Role::Admin, Role::Manager, Role::Diner, Role::Staff] {
            let actor = Actor::from_identity(7, role);
            assert_eq!(actor.role(), role);
            assert_eq!(actor.id(), 7);
        }
        assert_eq!(Actor::Staff { staff_id: 3 }.to_string(), "staff:3");
    }
}
