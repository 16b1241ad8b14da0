//! Session commands.

use cartkeeper_core::{Email, UserId, UserRole};
use cartkeeper_store::{SessionUser, StateStorage, Storefront};
use secrecy::SecretString;

use super::{CommandError, print};

/// Record a sign-in with a token obtained from the backend.
pub fn login<S: StateStorage>(
    store: &mut Storefront<S>,
    user_id: String,
    name: String,
    email: &str,
    role: UserRole,
    token: String,
) -> Result<(), CommandError> {
    if token.is_empty() {
        return Err(CommandError::EmptyToken);
    }
    let user = SessionUser {
        id: UserId::new(user_id),
        name,
        email: Email::parse(email)?,
        role,
    };
    store.login(user, SecretString::from(token));
    show(store);
    Ok(())
}

pub fn logout<S: StateStorage>(store: &mut Storefront<S>) {
    store.logout();
    print("Signed out\n");
}

pub fn show<S: StateStorage>(store: &Storefront<S>) {
    let session = store.session();
    match session.user().filter(|_| session.is_authenticated()) {
        Some(user) => print(&format!(
            "Signed in as {} <{}> ({}) since {}\n",
            user.name,
            user.email,
            user.role,
            session
                .logged_in_at()
                .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339()),
        )),
        None => print("Not signed in\n"),
    }
}
