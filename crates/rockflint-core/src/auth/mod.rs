//! Authentication module for managing credentials and sessions.
//!
//! This module provides:
//! - `TokenStore`: access/refresh tokens and cached user, persisted to disk
//! - `AuthSession`: sign-in (with optional OTP step), profile load, sign-out
//! - `CredentialStore`: optional OS keychain storage for a remembered password

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::CredentialStore;
pub use session::{AuthSession, OtpChallenge, SignIn};
pub use store::{CredentialState, StoreError, TokenStore, STORAGE_KEY};
