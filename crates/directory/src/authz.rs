//! Authorization decisions.
//!
//! Pure functions over the session cache's current identity: no I/O, no
//! mutation, no blocking. An admin passes every permission check;
//! everyone else is checked against a declarative permission table that
//! is built and validated once at startup, so a typo in a permission
//! name fails construction instead of silently denying forever.
//!
//! Unknown permission names and absent identities both deny (fail
//! closed).

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use shiftwise_core::Role;

use crate::models::Identity;
use crate::session::AuthState;

/// Errors raised while building a [`PermissionTable`].
#[derive(Debug, Error)]
pub enum PermissionTableError {
    /// A permission entry had an empty name.
    #[error("permission name cannot be empty")]
    EmptyName,

    /// The same permission name appeared twice.
    #[error("duplicate permission: {0}")]
    Duplicate(String),

    /// A permission listed no allowed roles.
    #[error("permission {0} allows no roles")]
    NoRoles(String),
}

/// Declarative mapping from permission name to the roles allowed it.
#[derive(Debug, Clone)]
pub struct PermissionTable {
    table: HashMap<String, HashSet<Role>>,
}

impl PermissionTable {
    /// Build and validate a table from (name, allowed roles) entries.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionTableError`] for empty names, duplicates, or
    /// entries allowing no roles.
    pub fn new<I, S>(entries: I) -> Result<Self, PermissionTableError>
    where
        I: IntoIterator<Item = (S, Vec<Role>)>,
        S: Into<String>,
    {
        let mut table = HashMap::new();
        for (name, roles) in entries {
            let name = name.into();
            if name.is_empty() {
                return Err(PermissionTableError::EmptyName);
            }
            if roles.is_empty() {
                return Err(PermissionTableError::NoRoles(name));
            }
            if table.insert(name.clone(), roles.into_iter().collect()).is_some() {
                return Err(PermissionTableError::Duplicate(name));
            }
        }
        Ok(Self { table })
    }

    /// The built-in workforce permission table.
    #[must_use]
    pub fn builtin() -> Self {
        let employee = || vec![Role::Employee, Role::Admin];
        let admin_only = || vec![Role::Admin];

        let mut table = HashMap::new();
        for (name, roles) in [
            ("view_own_schedule", employee()),
            ("record_time", employee()),
            ("view_own_payslips", employee()),
            ("edit_schedules", admin_only()),
            ("approve_timesheets", admin_only()),
            ("run_payroll", admin_only()),
            ("view_directory", admin_only()),
            ("manage_accounts", admin_only()),
        ] {
            table.insert(name.to_owned(), roles.into_iter().collect());
        }
        Self { table }
    }

    /// Whether `role` is allowed `permission`.
    ///
    /// Total: admin is allowed everything, an unknown permission name
    /// denies.
    #[must_use]
    pub fn allows(&self, permission: &str, role: Role) -> bool {
        if role.is_admin() {
            return true;
        }
        self.table
            .get(permission)
            .is_some_and(|roles| roles.contains(&role))
    }

    /// Names known to the table, for startup validation of references.
    pub fn permission_names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Decision functions over a snapshot of the session state.
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    table: PermissionTable,
}

impl Authorizer {
    /// Create an authorizer over the given permission table.
    #[must_use]
    pub const fn new(table: PermissionTable) -> Self {
        Self { table }
    }

    /// Whether the current identity holds the admin role.
    ///
    /// `Unknown` and `Unauthenticated` both answer `false`.
    #[must_use]
    pub fn is_admin(&self, state: &AuthState) -> bool {
        state.identity().is_some_and(Identity::is_admin)
    }

    /// Whether the current identity is allowed the named permission.
    ///
    /// Admin passes unconditionally; otherwise the table decides.
    /// Unknown permission names and absent identities deny.
    #[must_use]
    pub fn has_permission(&self, state: &AuthState, permission: &str) -> bool {
        state
            .identity()
            .is_some_and(|identity| self.table.allows(permission, identity.role))
    }
}
