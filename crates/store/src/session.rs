//! Session and authentication state.
//!
//! Opaque to the cart: the store only records who is signed in and the
//! bearer token the backend issued, so checkout and admin screens can be
//! gated. The token is kept in a [`SecretString`] and never shows up in
//! `Debug` output.

use cartkeeper_core::{Email, UserId, UserRole};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Profile of the signed-in user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Role; only `admin` unlocks the admin panels.
    #[serde(default)]
    pub role: UserRole,
}

/// `{ user, token, isAuthenticated }` plus the login time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    user: Option<SessionUser>,
    #[serde(
        serialize_with = "serialize_token",
        deserialize_with = "deserialize_token",
        default
    )]
    token: Option<SecretString>,
    is_authenticated: bool,
    #[serde(default)]
    logged_in_at: Option<DateTime<Utc>>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful sign-in. Replaces any previous session.
    ///
    /// An empty token is not a credential: the call is ignored and returns
    /// `false`, matching how an empty stored token reloads as signed out.
    pub fn login(&mut self, user: SessionUser, token: SecretString) -> bool {
        if token.expose_secret().is_empty() {
            return false;
        }
        self.user = Some(user);
        self.token = Some(token);
        self.is_authenticated = true;
        self.logged_in_at = Some(Utc::now());
        true
    }

    /// Forget the user and token. Returns `false` if nobody was signed in.
    pub fn logout(&mut self) -> bool {
        let changed = self.user.is_some() || self.token.is_some() || self.is_authenticated;
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
        self.logged_in_at = None;
        changed
    }

    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Whether the session carries an authenticated user with a token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
            && self
                .token
                .as_ref()
                .is_some_and(|t| !t.expose_secret().is_empty())
    }

    #[must_use]
    pub const fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        self.logged_in_at
    }
}

#[allow(clippy::ref_option)] // signature fixed by serde's serialize_with
fn serialize_token<S: Serializer>(
    token: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match token {
        Some(token) => serializer.serialize_some(token.expose_secret()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_token<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(token.filter(|t| !t.is_empty()).map(SecretString::from))
}
