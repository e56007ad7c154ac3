//! Account endpoints under `/api/users/`.
//!
//! These calls only talk to the server; storing the returned tokens is the
//! job of `AuthSession`.

use serde_json::json;

use crate::models::{
    ChangePasswordRequest, LoginRequest, MessageResponse, OtpLoginResponse, PasswordResetConfirm,
    ProfilePayload, RefreshGrant, RegisterRequest, RegisterResponse, TokenPair, UserProfile,
    VerifyOtpRequest,
};

use super::client::TOKEN_REFRESH_PATH;
use super::{ApiClient, ApiError, RequestOptions};

impl ApiClient {
    /// Create an inactive account; the server emails an activation link.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let options = RequestOptions::post().public().json(payload)?;
        self.execute("/api/users/register/", &options).await
    }

    /// Password login returning a token pair directly.
    pub async fn login(&self, payload: &LoginRequest) -> Result<TokenPair, ApiError> {
        let options = RequestOptions::post().public().json(payload)?;
        self.execute("/api/users/login/", &options).await
    }

    /// First step of the OTP login; tells whether a one-time code is needed.
    pub async fn login_with_otp(&self, payload: &LoginRequest) -> Result<OtpLoginResponse, ApiError> {
        let options = RequestOptions::post().public().json(payload)?;
        self.execute("/api/users/auth/login/", &options).await
    }

    pub async fn verify_otp(&self, payload: &VerifyOtpRequest) -> Result<TokenPair, ApiError> {
        let options = RequestOptions::post().public().json(payload)?;
        self.execute("/api/users/auth/verify-otp/", &options).await
    }

    /// Explicit refresh call. The executor refreshes on its own after a 401;
    /// this is for callers that want to renew a session proactively.
    pub async fn refresh_token(&self, refresh: &str) -> Result<TokenPair, ApiError> {
        let options = RequestOptions::post()
            .public()
            .json(&json!({ "refresh": refresh }))?;
        let grant: RefreshGrant = self.execute(TOKEN_REFRESH_PATH, &options).await?;
        Ok(TokenPair {
            access: grant.access,
            refresh: grant.refresh.unwrap_or_else(|| refresh.to_string()),
        })
    }

    pub async fn fetch_me(&self) -> Result<UserProfile, ApiError> {
        self.execute("/api/users/me/", &RequestOptions::get()).await
    }

    pub async fn update_profile(&self, payload: &ProfilePayload) -> Result<ProfilePayload, ApiError> {
        let options = RequestOptions::put().json(payload)?;
        self.execute("/api/users/profile/", &options).await
    }

    pub async fn password_reset(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let options = RequestOptions::post()
            .public()
            .json(&json!({ "email": email }))?;
        self.execute("/api/users/password-reset/", &options).await
    }

    pub async fn password_reset_confirm(
        &self,
        payload: &PasswordResetConfirm,
    ) -> Result<MessageResponse, ApiError> {
        let options = RequestOptions::post().public().json(payload)?;
        self.execute("/api/users/password-reset/confirm/", &options).await
    }

    pub async fn change_password(&self, payload: &ChangePasswordRequest) -> Result<(), ApiError> {
        let options = RequestOptions::put().json(payload)?;
        self.execute_unit("/api/users/change-password/", &options).await
    }

    pub async fn deactivate_account(&self) -> Result<MessageResponse, ApiError> {
        self.execute("/api/users/deactivate/", &RequestOptions::post()).await
    }

    pub async fn delete_account(&self) -> Result<(), ApiError> {
        self.execute_unit("/api/users/delete/", &RequestOptions::delete()).await
    }

    /// Confirm an emailed activation link.
    pub async fn activate_account(&self, uidb64: &str, token: &str) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/users/activate/{}/{}/", uidb64, token);
        self.execute(&path, &RequestOptions::get().public()).await
    }
}
