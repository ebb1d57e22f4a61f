//! Record-level access control.
//!
//! Role checks (farmer vs admin route) happen on [`AuthUser`](crate::extractors::auth::AuthUser);
//! this module decides whether a caller may touch one specific record.

use uuid::Uuid;

use crate::error::AppError;

/// Which owners' records a caller may access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessScope {
    /// Only records owned by this id.
    Owner(Uuid),
    /// Any record (admin).
    Unrestricted,
}

/// Allow access to a record owned by `owner_id`, or fail with `Forbidden`.
///
/// Callers look the record up first, so a missing record is reported as
/// `NotFound` before ownership is considered.
pub fn authorize(owner_id: Uuid, scope: AccessScope, what: &str) -> Result<(), AppError> {
    match scope {
        AccessScope::Unrestricted => Ok(()),
        AccessScope::Owner(caller) if caller == owner_id => Ok(()),
        AccessScope::Owner(_) => Err(AppError::Forbidden(format!(
            "Not authorized to access this {what}"
        ))),
    }
}

/// Look up a record and check access in one step: `NotFound` first, then `Forbidden`.
pub fn require_access<T>(
    found: Option<T>,
    owner_of: impl FnOnce(&T) -> Uuid,
    scope: AccessScope,
    what: &str,
) -> Result<T, AppError> {
    let item = found.ok_or_else(|| AppError::NotFound(format!("{} not found", capitalize(what))))?;
    authorize(owner_of(&item), scope, what)?;
    Ok(item)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
