//! Authenticated request pipeline
//!
//! Every backend call goes through `ApiClient`: it attaches the bearer
//! token when one exists, treats 204 as an absent payload, and collapses
//! all failures into the three `ApiError` classes. A 401 clears the stored
//! token and notifies the shell's `UnauthorizedHook`; nothing is retried
//! at this layer.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::HttpConfig;
use crate::session::{SessionStore, UnauthorizedHook};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Classified outcome of a failed request.
///
/// Callers get exactly one error shape: the resolved message string,
/// never the raw transport error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 401 from the backend. The token has already been cleared.
    #[error("Unauthorized. Logging out.")]
    Unauthorized,

    /// Non-2xx with a body: the server's `detail` field when present,
    /// otherwise "API Error: <status> <statusText>".
    #[error("{0}")]
    Server(String),

    /// No usable response at all (connect failure, timeout, bad payload).
    #[error("API Error: {0}")]
    Transport(String),
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Resolve the display message for a non-2xx, non-401 response.
fn server_error_message(status: StatusCode, body: &[u8]) -> String {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);

    match detail {
        Some(d) if !d.is_empty() => d,
        _ => format!(
            "API Error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        ),
    }
}

/// Decode a successful response body.
///
/// 204 and empty bodies deserialize from JSON null, so callers asking for
/// an `Option<T>` see `None` instead of a decode error.
fn decode_payload<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    if status == StatusCode::NO_CONTENT || body.is_empty() {
        return serde_json::from_value(serde_json::Value::Null)
            .map_err(|e| ApiError::Transport(e.to_string()));
    }

    serde_json::from_slice(body).map_err(|e| ApiError::Transport(e.to_string()))
}

pub struct ApiClient {
    inner: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    on_unauthorized: Option<Box<dyn UnauthorizedHook>>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        session: Arc<dyn SessionStore>,
        http: &HttpConfig,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );

        let timeout = if http.timeout > 0 {
            Duration::from_secs(http.timeout)
        } else {
            DEFAULT_TIMEOUT
        };
        let connect_timeout = if http.connect_timeout > 0 {
            Duration::from_secs(http.connect_timeout)
        } else {
            CONNECT_TIMEOUT
        };

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            inner: client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            on_unauthorized: None,
        })
    }

    /// Install the shell collaborator invoked when a 401 is classified.
    pub fn with_unauthorized_hook(mut self, hook: Box<dyn UnauthorizedHook>) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.inner.get(self.endpoint(path))).await
    }

    pub async fn post<T, B>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.inner.post(self.endpoint(path)).json(payload))
            .await
    }

    pub async fn put<T, B>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.inner.put(self.endpoint(path)).json(payload))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.inner.delete(self.endpoint(path))).await
    }

    /// Form-encoded POST, used by the login endpoint.
    pub async fn post_form<T, B>(&self, path: &str, form: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.inner.post(self.endpoint(path)).form(form))
            .await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Set the Authorization header when a token exists; otherwise the
    /// request goes out unauthenticated and the backend rejects it.
    fn attach_token(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 401 path: drop the stale token, tell the shell, hand back the
    /// classified error.
    fn unauthorized(&self) -> ApiError {
        self.session.clear();
        if let Some(hook) = &self.on_unauthorized {
            hook.on_unauthorized();
        }
        ApiError::Unauthorized
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let builder = self.attach_token(builder);

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(self.unauthorized());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!("Request failed with status {}", status);
            return Err(ApiError::Server(server_error_message(status, &body)));
        }

        decode_payload(status, &body)
    }
}
