//! The session context handed to back-office operations.
//!
//! There is no ambient "current user". Callers hold a [`SessionContext`]
//! and either ask it directly or [`subscribe`](SessionContext::subscribe)
//! to sign-in and sign-out events. Dropping a [`Subscription`] ends it.

use crate::{AuthError, AuthProvider, AuthSession, Role, User};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Who is signed in, observable.
pub struct SessionContext {
    provider: Arc<dyn AuthProvider>,
    session: Mutex<Option<AuthSession>>,
    current: watch::Sender<Option<User>>,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            provider,
            session: Mutex::new(None),
            current,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let session = self.provider.sign_in(email, password).await?;
        let user = session.user.clone();
        self.set(Some(session));
        Ok(user)
    }

    /// Sign out locally even if the provider has already forgotten the
    /// session.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.take() else {
            return Ok(());
        };
        self.current.send_replace(None);
        match self.provider.sign_out(&session.token).await {
            Ok(()) | Err(AuthError::SessionNotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// The signed-in user. An expired session is cleared first.
    pub fn current_user(&self) -> Option<User> {
        self.require_user().ok()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// The signed-in user, or [`AuthError::NotSignedIn`].
    ///
    /// An expired session is cleared and reported as expired.
    pub fn require_user(&self) -> Result<User, AuthError> {
        if let Some(session) = self.lock().as_ref() {
            if !session.is_expired() {
                return Ok(session.user.clone());
            }
        } else {
            return Err(AuthError::NotSignedIn);
        }
        self.set(None);
        tracing::info!("session expired, signed out");
        Err(AuthError::SessionExpired)
    }

    pub fn require_role(&self, role: Role) -> Result<User, AuthError> {
        let user = self.require_user()?;
        if user.has_permission(role) {
            Ok(user)
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }

    /// Observe sign-in and sign-out.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.current.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.current.receiver_count()
    }

    fn set(&self, session: Option<AuthSession>) {
        let user = session.as_ref().map(|s| s.user.clone());
        *self.lock() = session;
        self.current.send_replace(user);
    }

    fn take(&self) -> Option<AuthSession> {
        self.lock().take()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<AuthSession>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A live subscription to the current user.
pub struct Subscription {
    receiver: watch::Receiver<Option<User>>,
}

impl Subscription {
    pub fn current(&self) -> Option<User> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the context is gone.
    pub async fn changed(&mut self) -> Option<Option<User>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}
