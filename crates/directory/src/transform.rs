//! Mapping between profile store rows and identity values.
//!
//! The store keeps flat, snake-case, nullable rows; the domain works
//! with fully populated [`Identity`] values. Reads are lenient (missing
//! strings become `""`, missing numbers become zero, unknown roles
//! become employee) and a malformed row is dropped from a batch rather
//! than failing it. Writes are partial: only the fields present in the
//! payload appear in the outgoing row.

use chrono::Utc;
use rust_decimal::Decimal;

use shiftwise_core::Role;

use crate::models::{
    AccountSummary, Address, Identity, ProfileDraft, ProfileRow, ProfileUpdate,
};

/// Map a stored row to an identity.
///
/// Returns `None` (and logs) when the row carries no usable id; every
/// other defect is repaired with defaults.
#[must_use]
pub fn to_identity(row: &ProfileRow) -> Option<Identity> {
    let id = match row.id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => {
            tracing::warn!(?row, "dropping profile row without an id");
            return None;
        }
    };

    Some(Identity {
        id: id.into(),
        email: string_or_empty(row.email.as_deref()),
        first_name: string_or_empty(row.first_name.as_deref()),
        last_name: string_or_empty(row.last_name.as_deref()),
        role: Role::from_stored(row.role.as_deref()),
        position: string_or_empty(row.position.as_deref()),
        department: string_or_empty(row.department.as_deref()),
        hourly_rate: row.hourly_rate.unwrap_or(Decimal::ZERO),
        phone: string_or_empty(row.phone.as_deref()),
        avatar_url: string_or_empty(row.avatar_url.as_deref()),
        address: Address {
            line1: string_or_empty(row.address_line1.as_deref()),
            line2: string_or_empty(row.address_line2.as_deref()),
            city: string_or_empty(row.address_city.as_deref()),
            region: string_or_empty(row.address_region.as_deref()),
            postal_code: string_or_empty(row.address_postal_code.as_deref()),
            country: string_or_empty(row.address_country.as_deref()),
        },
    })
}

/// Map a batch of rows, dropping the ones that fail to map.
#[must_use]
pub fn to_identities(rows: &[ProfileRow]) -> Vec<Identity> {
    rows.iter().filter_map(to_identity).collect()
}

/// Full row for an identity, for write paths that replace a record.
///
/// Only populated fields are emitted; empty strings and a zero rate are
/// left absent so the store is not filled with noise columns.
#[must_use]
pub fn to_profile_row(identity: &Identity) -> ProfileRow {
    ProfileRow {
        id: Some(identity.id.as_str().to_owned()),
        email: present(&identity.email),
        first_name: present(&identity.first_name),
        last_name: present(&identity.last_name),
        role: Some(identity.role.as_str().to_owned()),
        position: present(&identity.position),
        department: present(&identity.department),
        hourly_rate: (identity.hourly_rate != Decimal::ZERO).then_some(identity.hourly_rate),
        phone: present(&identity.phone),
        avatar_url: present(&identity.avatar_url),
        address_line1: present(&identity.address.line1),
        address_line2: present(&identity.address.line2),
        address_city: present(&identity.address.city),
        address_region: present(&identity.address.region),
        address_postal_code: present(&identity.address.postal_code),
        address_country: present(&identity.address.country),
        created_at: None,
    }
}

/// Row for a freshly created account.
pub(crate) fn draft_row(id: &shiftwise_core::AccountId, draft: &ProfileDraft) -> ProfileRow {
    ProfileRow {
        id: Some(id.as_str().to_owned()),
        email: Some(draft.email.as_str().to_owned()),
        first_name: present(&draft.first_name),
        last_name: present(&draft.last_name),
        role: Some(draft.role.as_str().to_owned()),
        position: draft.position.clone(),
        department: draft.department.clone(),
        hourly_rate: draft.hourly_rate,
        phone: draft.phone.clone(),
        created_at: Some(Utc::now()),
        ..Default::default()
    }
}

/// Minimal row seeded from provider metadata during synchronization.
pub(crate) fn seed_row(summary: &AccountSummary) -> ProfileRow {
    ProfileRow {
        id: Some(summary.id.as_str().to_owned()),
        email: summary.email.clone(),
        first_name: summary.first_name.clone(),
        last_name: summary.last_name.clone(),
        role: Some(Role::Employee.as_str().to_owned()),
        created_at: Some(Utc::now()),
        ..Default::default()
    }
}

/// Partial row for an update payload; absent fields stay absent.
pub(crate) fn update_row(update: &ProfileUpdate) -> ProfileRow {
    ProfileRow {
        email: update.email.clone(),
        first_name: update.first_name.clone(),
        last_name: update.last_name.clone(),
        role: update.role.map(|r| r.as_str().to_owned()),
        position: update.position.clone(),
        department: update.department.clone(),
        hourly_rate: update.hourly_rate,
        phone: update.phone.clone(),
        avatar_url: update.avatar_url.clone(),
        ..Default::default()
    }
}

fn string_or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

fn present(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}
