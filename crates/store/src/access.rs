//! Session gate for checkout and admin screens.
//!
//! Mirrors the storefront's private-route guard: anonymous users are sent to
//! sign in, signed-in non-admins are kept out of admin pages.

use crate::error::AccessError;
use crate::session::{SessionState, SessionUser};

/// Require a signed-in user with a token.
///
/// # Errors
///
/// Returns [`AccessError::NotAuthenticated`] if the session has no token or
/// is not marked authenticated.
pub fn require_authenticated(session: &SessionState) -> Result<&SessionUser, AccessError> {
    if !session.is_authenticated() {
        return Err(AccessError::NotAuthenticated);
    }
    session.user().ok_or(AccessError::NotAuthenticated)
}

/// Require a signed-in admin.
///
/// # Errors
///
/// Returns [`AccessError::NotAuthenticated`] for anonymous sessions and
/// [`AccessError::NotAdmin`] when the user's role is not `admin`.
pub fn require_admin(session: &SessionState) -> Result<&SessionUser, AccessError> {
    let user = require_authenticated(session)?;
    if user.role.is_admin() {
        Ok(user)
    } else {
        tracing::debug!(user_id = %user.id, role = %user.role, "Admin access denied");
        Err(AccessError::NotAdmin)
    }
}
