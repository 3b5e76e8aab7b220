//! `/auth/*` routes.

use async_trait::async_trait;
use campus_core::user::User;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::auth::{
    Ack, AuthResponse, LoginRequest, RegisterRequest, SendOtpRequest, VerifyOtpRequest,
    VerifyResponse,
};
use crate::session::TokenVerifier;

const PATH: &str = "/auth";

pub struct AuthApi;

impl AuthApi {
    pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        api.post(&format!("{PATH}/login"), request).await
    }

    pub async fn register(
        api: &ApiClient,
        request: &RegisterRequest,
    ) -> Result<AuthResponse, ApiError> {
        api.post(&format!("{PATH}/register"), request).await
    }

    /// An empty acknowledgement body decodes as [`Ack::default`].
    pub async fn send_otp(api: &ApiClient, request: &SendOtpRequest) -> Result<Ack, ApiError> {
        let ack: Option<Ack> = api.post(&format!("{PATH}/send-otp"), request).await?;
        Ok(ack.unwrap_or_default())
    }

    pub async fn verify_otp(api: &ApiClient, request: &VerifyOtpRequest) -> Result<Ack, ApiError> {
        let ack: Option<Ack> = api.post(&format!("{PATH}/verify-otp"), request).await?;
        Ok(ack.unwrap_or_default())
    }

    /// `GET /auth/verify` with an explicit bearer token.
    pub async fn verify(api: &ApiClient, token: &str) -> Result<User, ApiError> {
        let response: VerifyResponse = api
            .get_with_token(&format!("{PATH}/verify"), token)
            .await?;
        Ok(response.user)
    }
}

#[async_trait]
impl TokenVerifier for ApiClient {
    async fn verify_token(&self, token: &str) -> Result<User, ApiError> {
        AuthApi::verify(self, token).await
    }
}
