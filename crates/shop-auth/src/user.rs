//! User types.

use serde::{Deserialize, Serialize};
use shop_commerce::UserId;
use std::str::FromStr;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can view orders and the dashboard.
    #[default]
    Staff,
    /// Can also edit the catalog and delete orders.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Check if this role has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    fn level(&self) -> u8 {
        match self {
            Role::Staff => 0,
            Role::Admin => 1,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A signed-in back-office user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub roles: Vec<Role>,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            id,
            email: email.into(),
            name: None,
            roles,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name if set, otherwise the email address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Check whether any role grants `required`.
    pub fn has_permission(&self, required: Role) -> bool {
        self.roles.iter().any(|r| r.has_permission(required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.has_permission(Role::Staff));
        assert!(!Role::Staff.has_permission(Role::Admin));
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_user() {
        let user = User::new(UserId::new("u1"), "admin@shop.test", vec![Role::Admin]);
        assert_eq!(user.display_name(), "admin@shop.test");
        assert!(user.has_permission(Role::Staff));

        let named = user.with_name("Nadia");
        assert_eq!(named.display_name(), "Nadia");
    }
}
