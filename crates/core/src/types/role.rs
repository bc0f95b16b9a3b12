//! Account role with different permission levels.

use serde::{Deserialize, Serialize};

/// Role held by an account.
///
/// The directory recognizes exactly two roles. Anything else found in a
/// stored profile is treated as [`Role::Employee`] on read; see
/// [`Role::from_stored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to directory management and every permission.
    Admin,
    /// Regular workforce member with scoped permissions.
    #[default]
    Employee,
}

impl Role {
    /// Interpret a value read back from the profile store.
    ///
    /// Stored rows are not trusted to hold a valid role: unknown or
    /// missing values fall back to [`Role::Employee`].
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Self::Admin,
            _ => Self::Employee,
        }
    }

    /// The stored string form of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }

    /// Whether this role is [`Role::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
