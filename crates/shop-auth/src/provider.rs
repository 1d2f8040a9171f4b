//! Authentication collaborator.

use crate::{AuthError, AuthSession, PasswordHasher, Role, SessionToken, User};
use async_trait::async_trait;
use shop_commerce::UserId;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Email/password sign-in backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError>;

    /// Look up a live session.
    async fn session(&self, token: &SessionToken) -> Result<AuthSession, AuthError>;
}

struct Account {
    user: User,
    password_hash: String,
}

/// Provider backed by accounts registered at startup.
#[derive(Default)]
pub struct InMemoryAuthProvider {
    hasher: PasswordHasher,
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<SessionToken, AuthSession>>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account from an existing Argon2 hash.
    pub async fn add_account(&self, email: &str, password_hash: impl Into<String>, roles: Vec<Role>) -> User {
        let key = normalize_email(email);
        let user = User::new(generate_user_id(), key.clone(), roles);
        self.accounts.write().await.insert(
            key,
            Account {
                user: user.clone(),
                password_hash: password_hash.into(),
            },
        );
        user
    }

    /// Hash `password` and register an account.
    pub async fn register(&self, email: &str, password: &str, roles: Vec<Role>) -> Result<User, AuthError> {
        PasswordHasher::validate_password(password)?;
        let hash = self.hasher.hash(password)?;
        Ok(self.add_account(email, hash, roles).await)
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let key = normalize_email(email);
        let user = {
            let accounts = self.accounts.read().await;
            let account = accounts.get(&key).ok_or(AuthError::InvalidCredentials)?;
            if !self.hasher.verify(password, &account.password_hash)? {
                tracing::warn!(email = %key, "sign-in rejected");
                return Err(AuthError::InvalidCredentials);
            }
            account.user.clone()
        };

        let session = AuthSession::new(user);
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        tracing::info!(email = %key, "signed in");
        Ok(session)
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError> {
        match self.sessions.write().await.remove(token) {
            Some(session) => {
                tracing::info!(email = %session.user.email, "signed out");
                Ok(())
            }
            None => Err(AuthError::SessionNotFound),
        }
    }

    async fn session(&self, token: &SessionToken) -> Result<AuthSession, AuthError> {
        let session = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(AuthError::SessionNotFound)?;
        session.validate()?;
        Ok(session)
    }
}

fn generate_user_id() -> UserId {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    UserId::new(format!("user_{suffix}"))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
