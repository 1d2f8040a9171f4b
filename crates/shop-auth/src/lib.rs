//! Authentication for the back office.
//!
//! Provides password hashing, sign-in through an [`AuthProvider`], and a
//! [`SessionContext`] that is passed explicitly to whatever needs to know
//! who is signed in.

mod context;
mod error;
mod password;
mod provider;
mod session;
mod user;

pub use context::{SessionContext, Subscription};
pub use error::AuthError;
pub use password::PasswordHasher;
pub use provider::{AuthProvider, InMemoryAuthProvider};
pub use session::{AuthSession, SessionToken};
pub use user::{Role, User};
