use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::models::{LoginRequest, TokenPair, UserProfile, VerifyOtpRequest};

use super::TokenStore;

/// Pending second factor after a password check that requires an OTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub user_id: i64,
    pub remember_me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    /// Tokens are stored; the session is usable.
    Authenticated,
    /// The account needs a one-time code; call `verify_otp`.
    OtpRequired(OtpChallenge),
}

/// Sign-in/sign-out flow on top of `ApiClient` and its `TokenStore`.
#[derive(Clone)]
pub struct AuthSession {
    api: ApiClient,
}

impl AuthSession {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        self.api.store()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store().is_authenticated()
    }

    /// Check the password and either store a token pair or hand back an
    /// OTP challenge.
    pub async fn sign_in(&self, email: &str, password: &str, remember_me: bool) -> Result<SignIn> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember_me: Some(remember_me),
        };

        let step = self
            .api
            .login_with_otp(&request)
            .await
            .context("Login failed")?;

        if step.otp_required {
            let user_id = step
                .user_id
                .ok_or_else(|| anyhow::anyhow!("Server requested an OTP without a user id"))?;
            debug!(user_id, "OTP required");
            return Ok(SignIn::OtpRequired(OtpChallenge {
                user_id,
                remember_me: step.remember_me,
            }));
        }

        let tokens = self.api.login(&request).await.context("Login failed")?;
        self.accept(tokens);
        info!("Signed in");
        Ok(SignIn::Authenticated)
    }

    /// Complete a sign-in with the emailed one-time code.
    pub async fn verify_otp(&self, challenge: &OtpChallenge, code: &str) -> Result<()> {
        let request = VerifyOtpRequest {
            user_id: challenge.user_id,
            otp: code.trim().to_string(),
            remember_me: Some(challenge.remember_me),
        };
        let tokens = self
            .api
            .verify_otp(&request)
            .await
            .context("OTP verification failed")?;
        self.accept(tokens);
        info!("Signed in with OTP");
        Ok(())
    }

    /// Fetch the current user and cache it in the store.
    pub async fn load_profile(&self) -> Result<UserProfile> {
        let user = self
            .api
            .fetch_me()
            .await
            .context("Failed to load profile")?;
        self.store().set_user(Some(user.clone()));
        Ok(user)
    }

    /// Forget tokens and user.
    pub fn sign_out(&self) {
        self.store().clear();
        info!("Signed out");
    }

    fn accept(&self, tokens: TokenPair) {
        self.store()
            .set_tokens(Some(tokens.access), Some(tokens.refresh));
    }
}
