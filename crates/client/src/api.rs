//! REST gateway client for the campus backend.
//!
//! Thin wrapper over [`reqwest`] that adds the JSON content type, the
//! bearer token of the current session and a per-request id, and
//! normalizes failures into [`ApiError`].

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;

use crate::error::ApiError;
use crate::session::SessionState;

/// Header carrying a client-generated id for log correlation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for one backend.
///
/// Cheap to clone: the inner [`reqwest::Client`] is reference counted and
/// the session receiver is a shared channel handle.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Option<watch::Receiver<SessionState>>,
}

impl ApiClient {
    /// Create a client for `base_url`, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            session: None,
        }
    }

    /// Attach the session channel; authenticated requests read the current
    /// token from it at send time.
    pub fn with_session(mut self, session: watch::Receiver<SessionState>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET path` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let token = self.bearer();
        self.send(Method::GET, path, token.as_deref(), None::<&()>, None::<&()>)
            .await
    }

    /// `GET path?query` and decode the JSON body.
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let token = self.bearer();
        self.send(Method::GET, path, token.as_deref(), Some(query), None::<&()>)
            .await
    }

    /// `GET path` with an explicit token instead of the session's.
    pub async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        self.send(Method::GET, path, Some(token), None::<&()>, None::<&()>)
            .await
    }

    /// `POST path` with a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.bearer();
        self.send(Method::POST, path, token.as_deref(), None::<&()>, Some(body))
            .await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.bearer();
        self.send(Method::PUT, path, token.as_deref(), None::<&()>, Some(body))
            .await
    }

    /// `DELETE path`, discarding any acknowledgement body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let token = self.bearer();
        let _: serde_json::Value = self
            .send(Method::DELETE, path, token.as_deref(), None::<&()>, None::<&()>)
            .await?;
        Ok(())
    }

    // ---- private helpers ----

    fn bearer(&self) -> Option<String> {
        self.session
            .as_ref()
            .and_then(|rx| rx.borrow().token().map(str::to_owned))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T, Q, B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let request_id = uuid::Uuid::new_v4().to_string();
        let url = self.url(path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, request_id = %request_id, "Sending request");

        let response = request.send().await.map_err(|e| {
            let hint = connectivity_hint(&e);
            tracing::warn!(%method, path, error = %e, hint, "Backend unreachable");
            ApiError::Network {
                url: self.base_url.clone(),
                hint,
                source: e,
            }
        })?;

        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), request_id = %request_id, "Received response");

        let response = Self::ensure_success(response).await.inspect_err(|e| {
            tracing::warn!(%method, path, status = status.as_u16(), error = %e, "Request rejected");
        })?;

        self.parse_response(response, path).await
    }

    /// Map a non-2xx response onto [`ApiError`], reading the backend's
    /// `error`/`message` and `details` fields when present.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (message, details) = parse_error_body(status.as_u16(), &body);

        Err(match status.as_u16() {
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message, details },
            code => ApiError::Api {
                status: code,
                message,
                details,
            },
        })
    }

    /// Decode a successful body. An empty body decodes as JSON `null`, so
    /// acknowledgements can be read as `()`, `Option<_>` or a `Value`.
    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, ApiError> {
        let bytes = response.bytes().await.map_err(|e| ApiError::Network {
            url: self.base_url.clone(),
            hint: "the response body could not be read",
            source: e,
        })?;
        let slice: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(slice).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

/// Extract a user-facing message and optional details from an error body.
///
/// Prefers `error`, then `message`; falls back to the raw text, then to the
/// status code.
pub fn parse_error_body(status: u16, body: &str) -> (String, Option<serde_json::Value>) {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        let message = ["error", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        let details = map.get("details").cloned().filter(|d| !d.is_null());
        return (message, details);
    }

    let text = body.trim();
    if text.is_empty() {
        (format!("Request failed with status {status}"), None)
    } else {
        (text.to_string(), None)
    }
}

/// Short diagnostic for a transport failure.
fn connectivity_hint(error: &reqwest::Error) -> &'static str {
    if error.is_connect() {
        "could not connect; check that the backend is running and the URL is correct"
    } else if error.is_timeout() {
        "the request timed out"
    } else if error.is_request() {
        "the request could not be sent"
    } else {
        "the connection failed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_wins_over_message() {
        let (msg, details) =
            parse_error_body(400, r#"{"error":"Email taken","message":"ignored"}"#);
        assert_eq!(msg, "Email taken");
        assert!(details.is_none());
    }

    #[test]
    fn message_field_and_details_are_read() {
        let (msg, details) = parse_error_body(
            422,
            r#"{"message":"Invalid input","details":{"field":"email"}}"#,
        );
        assert_eq!(msg, "Invalid input");
        assert_eq!(details.unwrap()["field"], "email");
    }

    #[test]
    fn plain_text_body_is_used_verbatim() {
        let (msg, _) = parse_error_body(502, "  Bad Gateway  ");
        assert_eq!(msg, "Bad Gateway");
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let (msg, _) = parse_error_body(500, "");
        assert_eq!(msg, "Request failed with status 500");
    }

    #[test]
    fn object_without_known_fields_falls_back_to_status() {
        let (msg, _) = parse_error_body(409, r#"{"code":"DUP"}"#);
        assert_eq!(msg, "Request failed with status 409");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(api.base_url(), "http://localhost:5000/api");
        assert_eq!(api.url("/students"), "http://localhost:5000/api/students");
    }
}
