//! Identity domain types.
//!
//! [`Identity`] is the authenticated principal plus its denormalized
//! profile attributes. It is constructed on successful login (or for the
//! bootstrap override account), held in the session cache, and handed
//! out as the directory entry type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shiftwise_core::{AccountId, Role};

/// Postal address attached to a profile.
///
/// Every field is always populated; missing parts of a stored row map
/// to empty strings, never to an absent sub-object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

/// An authenticated principal with its profile attributes (domain type).
///
/// Also serves as the directory entry shape returned to callers; the
/// directory view of an account and the identity of a logged-in user
/// carry the same fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable account ID shared with the identity provider.
    pub id: AccountId,
    /// Email address as stored; empty if the row had none.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role; unknown stored values read as [`Role::Employee`].
    pub role: Role,
    /// Job title.
    pub position: String,
    /// Department name.
    pub department: String,
    /// Hourly pay rate.
    pub hourly_rate: Decimal,
    /// Contact phone number.
    pub phone: String,
    /// Avatar image reference.
    pub avatar_url: String,
    /// Postal address, always fully populated.
    pub address: Address,
}

impl Identity {
    /// Display name in "First Last" form, trimmed when a part is empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Whether this identity holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(first: &str, last: &str) -> Identity {
        Identity {
            id: AccountId::from("acct-1"),
            email: "a@example.com".into(),
            first_name: first.into(),
            last_name: last.into(),
            role: Role::Employee,
            position: String::new(),
            department: String::new(),
            hourly_rate: Decimal::ZERO,
            phone: String::new(),
            avatar_url: String::new(),
            address: Address::default(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(identity("Ada", "Lovelace").display_name(), "Ada Lovelace");
        assert_eq!(identity("Ada", "").display_name(), "Ada");
        assert_eq!(identity("", "").display_name(), "");
    }

    #[test]
    fn test_is_admin() {
        let mut id = identity("Ada", "Lovelace");
        assert!(!id.is_admin());
        id.role = Role::Admin;
        assert!(id.is_admin());
    }
}
