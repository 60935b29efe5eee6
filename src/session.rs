//! Identity session
//!
//! Sign-in is delegated to an `IdentityProvider`. The result is an explicit
//! `Session` value handed to whatever needs identity; nothing reads the
//! signed-in user from global state. `SessionState` holds the current
//! session for the terminal browser and enforces the lifecycle: created on
//! successful sign-in, destroyed on sign-out.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// The signed-in user as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    pub email: String,
}

impl UserProfile {
    /// Validate and build a profile; the email must be email-shaped
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Result<Self, SessionError> {
        let email = email.into();
        if !is_email_shaped(&email) {
            return Err(SessionError::InvalidEmail(email));
        }
        Ok(Self {
            display_name: display_name.into(),
            email,
        })
    }
}

fn is_email_shaped(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// A live sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: UserProfile,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: UserProfile) -> Self {
        Self {
            user,
            started_at: Utc::now(),
        }
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// External identity provider boundary
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Perform the sign-in action
    async fn sign_in(&self) -> Result<Session, SessionError>;

    /// End `session`; it is consumed either way
    async fn sign_out(&self, session: Session) -> Result<(), SessionError>;
}

/// Provider backed by a locally configured profile
#[derive(Debug, Clone, Default)]
pub struct LocalProfileProvider {
    profile: Option<UserProfile>,
}

impl LocalProfileProvider {
    pub fn new(profile: Option<UserProfile>) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl IdentityProvider for LocalProfileProvider {
    async fn sign_in(&self) -> Result<Session, SessionError> {
        let profile = self.profile.clone().ok_or(SessionError::NoProfile)?;
        Ok(Session::new(profile))
    }

    async fn sign_out(&self, _session: Session) -> Result<(), SessionError> {
        Ok(())
    }
}

/// Signed-in or not
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            SessionState::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionState::SignedIn(_))
    }

    /// Sign in through `provider`; a no-op when already signed in
    pub async fn sign_in(&mut self, provider: &dyn IdentityProvider) -> Result<(), SessionError> {
        if self.is_signed_in() {
            return Ok(());
        }
        let session = provider.sign_in().await?;
        info!("Signed in as {}", session.user().email);
        *self = SessionState::SignedIn(session);
        Ok(())
    }

    /// Sign out through `provider`; the session is dropped even if the
    /// provider reports an error
    pub async fn sign_out(&mut self, provider: &dyn IdentityProvider) -> Result<(), SessionError> {
        match std::mem::take(self) {
            SessionState::SignedIn(session) => {
                info!("Signing out {}", session.user().email);
                provider.sign_out(session).await
            }
            SessionState::SignedOut => Ok(()),
        }
    }
}
