use std::sync::Arc;

use campus_client::models::auth::{
    LoginRequest, RegisterRequest, SendOtpRequest, VerifyOtpRequest,
};
use campus_client::resources::auth::AuthApi;
use campus_client::session::{FileStorage, SessionStorage};
use campus_client::{ApiClient, Session, SessionState, SessionStore};
use campus_core::user::User;
use campus_core::validation::validate_form;

use crate::config::ClientConfig;
use crate::error::AppResult;

/// Shared application state handed to every screen.
///
/// Cheap to clone: the API client and the session store are shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClientConfig>,
    /// Gateway client wired to the session's token.
    pub api: ApiClient,
    pub session: Arc<SessionStore>,
}

impl AppState {
    /// State backed by the file session store in `config.data_dir`.
    pub fn new(config: ClientConfig) -> Self {
        let storage = FileStorage::new(config.data_dir.clone());
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: ClientConfig, storage: impl SessionStorage + 'static) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        let api = ApiClient::new(config.api_url.clone()).with_session(session.subscribe());
        Self {
            config: Arc::new(config),
            api,
            session,
        }
    }

    /// Restore the persisted session and reconcile it with the backend.
    pub async fn start(&self) -> SessionState {
        self.session.init(&self.api).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validate_form(&request)?;
        let response = AuthApi::login(&self.api, &request).await?;
        self.install(response.token, response.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        validate_form(request)?;
        let response = AuthApi::register(&self.api, request).await?;
        self.install(response.token, response.user)
    }

    /// Ask the backend to text a one-time code to `phone`.
    pub async fn send_otp(&self, phone: &str) -> AppResult<String> {
        let request = SendOtpRequest {
            phone: phone.trim().to_string(),
        };
        validate_form(&request)?;
        let ack = AuthApi::send_otp(&self.api, &request).await?;
        Ok(ack.message.unwrap_or_else(|| "Verification code sent".to_string()))
    }

    pub async fn verify_otp(&self, phone: &str, otp: &str) -> AppResult<String> {
        let request = VerifyOtpRequest {
            phone: phone.trim().to_string(),
            otp: otp.trim().to_string(),
        };
        validate_form(&request)?;
        let ack = AuthApi::verify_otp(&self.api, &request).await?;
        Ok(ack.message.unwrap_or_else(|| "Phone number verified".to_string()))
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    fn install(&self, token: String, user: User) -> AppResult<User> {
        self.session.login(Session {
            token,
            user: user.clone(),
        })?;
        Ok(user)
    }
}
