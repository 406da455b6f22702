use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use url::Url;

use crate::error::{Error, Result};
use crate::observability;
use crate::store::CredentialStore;
use crate::types::{
    AuthTokens, ChangePasswordRequest, EmailResponse, EmailUpdateRequest, Envelope, LoginRequest,
    LogoutRequest, PhoneNumberResponse, PhoneNumberUpdateRequest, ProfileResponse,
    ProfileUpdateRequest, RefreshRequest, RefreshResponse, SignupRequest, UserDetailsResponse,
};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// Fixed path contracts with the TableMate server.
const LOGIN_PATH: &str = "/api/auth/login";
const REFRESH_PATH: &str = "/api/auth/refresh";
const LOGOUT_PATH: &str = "/api/auth/logout";
const SIGNUP_PATH: &str = "/api/user/signup";
const WITHDRAW_PATH: &str = "/api/user/withdraw";
const PROFILE_PATH: &str = "/api/user/profile";
const USER_DETAILS_PATH: &str = "/api/user/me/details";
const EMAIL_PATH: &str = "/api/user/email";
const PHONE_NUMBER_PATH: &str = "/api/user/phone-number";
const PASSWORD_PATH: &str = "/api/user/password";
const HEALTH_PATH: &str = "/api/health";

/// One logical request against the API.
///
/// The `retried` flag is scoped to the descriptor, not the client, so
/// each originating call goes through the refresh-and-retry cycle at
/// most once no matter how many calls are in flight.
struct RequestDescriptor {
    method: Method,
    path: &'static str,
    body: Option<serde_json::Value>,
    retried: bool,
}

impl RequestDescriptor {
    fn new(method: Method, path: &'static str, body: Option<serde_json::Value>) -> Self {
        Self {
            method,
            path,
            body,
            retried: false,
        }
    }
}

/// Client for the TableMate API.
///
/// Owns the base address and the injected credential store, attaches
/// `Authorization: Bearer` from the store at send time, and recovers
/// from access-token expiry exactly once per originating call: a 401
/// triggers a refresh against `/api/auth/refresh` and a single retry
/// with the new token. A failed refresh clears the store and fails the
/// call with [`Error::AuthExpired`].
#[derive(Clone)]
pub struct ApiClient {
    http: ReqwestClient,
    base_url: String,
    timeout: Duration,
    store: Arc<dyn CredentialStore>,
    // Coalesces concurrent refreshes: holders re-read the store after
    // acquiring the gate and skip the refresh another task completed.
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a new client against the default base address.
    ///
    /// The base address can be overridden with the TABLEMATE_API_URL
    /// environment variable.
    pub fn new(store: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::with_options(store, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        store: Arc<dyn CredentialStore>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("TABLEMATE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };
        Url::parse(&base_url)?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let http = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            http,
            base_url,
            timeout,
            store,
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }

    /// The base address requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential store this client reads and maintains.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Returns true if a credential pair is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.store.get().is_some()
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Issue a descriptor once, attaching the given access token if any.
    async fn send_raw(
        &self,
        descriptor: &RequestDescriptor,
        access_token: Option<&str>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, descriptor.path);

        let mut headers = self.default_headers();
        if let Some(token) = access_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                Error::http_client(
                    format!("Access token is not a valid header value: {}", e),
                    Some(Box::new(e)),
                )
            })?;
            headers.insert(header::AUTHORIZATION, value);
        }

        tracing::debug!(method = %descriptor.method, path = descriptor.path, "sending request");

        let mut request = self
            .http
            .request(descriptor.method.clone(), &url)
            .headers(headers);
        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            observability::CLIENT_REQUEST_ERRORS.click();
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        tracing::debug!(
            status = response.status().as_u16(),
            path = descriptor.path,
            "received response",
        );
        Ok(response)
    }

    /// Issue a descriptor with the refresh-and-retry cycle.
    ///
    /// The retry (if any) is strictly ordered after the failed first
    /// attempt and the refresh completion, and the refresh route never
    /// triggers a refresh against itself.
    async fn dispatch(&self, descriptor: &mut RequestDescriptor) -> Result<Response> {
        observability::CLIENT_REQUESTS.click();

        // Read the store at send time: login or a concurrent refresh
        // may have replaced the pair since this client was built.
        let sent_with = self.store.get().map(|tokens| tokens.access_token);
        let response = self.send_raw(descriptor, sent_with.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED
            || descriptor.retried
            || descriptor.path == REFRESH_PATH
        {
            return Ok(response);
        }
        descriptor.retried = true;

        tracing::debug!(path = descriptor.path, "access token rejected, refreshing");
        let access_token = match self.refresh_after(sent_with.as_deref()).await {
            Ok(access_token) => access_token,
            Err(err) => {
                observability::CLIENT_REFRESH_FAILURES.click();
                tracing::warn!(error = %err, "token refresh failed, clearing credentials");
                self.store.clear();
                return Err(Error::auth_expired(
                    "access token expired and refresh failed",
                ));
            }
        };

        observability::CLIENT_RETRIES.click();
        let response = self.send_raw(descriptor, Some(&access_token)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            // The retry carried a freshly issued token and was still
            // rejected; the session is gone.
            tracing::warn!(path = descriptor.path, "retry rejected, clearing credentials");
            self.store.clear();
            return Err(Error::auth_expired("request rejected after token refresh"));
        }
        Ok(response)
    }

    /// Refresh unless another task already did while we waited.
    ///
    /// `stale_access` is the token the failed attempt carried; if the
    /// stored token differs once the gate is held, the refresh has
    /// already happened and the current token is returned as-is.
    async fn refresh_after(&self, stale_access: Option<&str>) -> Result<String> {
        let _gate = self.refresh_gate.lock().await;
        if let Some(tokens) = self.store.get() {
            if stale_access != Some(tokens.access_token.as_str()) {
                return Ok(tokens.access_token);
            }
        }
        let refreshed = self.refresh_locked().await?;
        Ok(refreshed.access_token)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// On success the store is updated; a response without a rotated
    /// refresh token keeps the old one. Fails with
    /// [`Error::NoRefreshToken`] when nothing is stored — callers must
    /// treat that identically to a rejected refresh.
    pub async fn refresh(&self) -> Result<AuthTokens> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<AuthTokens> {
        let Some(tokens) = self.store.get() else {
            return Err(Error::NoRefreshToken);
        };
        observability::CLIENT_REFRESHES.click();

        let body = serde_json::to_value(RefreshRequest::new(&tokens.refresh_token))?;
        let descriptor = RequestDescriptor::new(Method::POST, REFRESH_PATH, Some(body));
        // The refresh call itself carries no bearer header; a 401 here
        // surfaces as an ordinary HTTP error and is never retried.
        let response = self.send_raw(&descriptor, None).await?;
        let envelope: Envelope<RefreshResponse> = Self::into_envelope(response).await?;
        let refreshed = envelope.into_data()?;

        let refresh_token = refreshed
            .refresh_token
            .unwrap_or(tokens.refresh_token);
        self.store.set(&refreshed.access_token, &refresh_token);
        tracing::info!("access token refreshed");

        Ok(AuthTokens::new(refreshed.access_token, refresh_token))
    }

    /// Convert a response into the envelope, mapping non-2xx statuses
    /// to [`Error::Http`] with the envelope message as the text.
    async fn into_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::process_error_response(response).await);
        }
        response.json::<Envelope<T>>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Extract the human-readable message from an error response.
    async fn process_error_response(response: Response) -> Error {
        observability::CLIENT_REQUEST_ERRORS.click();
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
            .map(|envelope| envelope.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    body
                }
            });
        Error::http(status.as_u16(), message)
    }

    /// Issue a request and unwrap the envelope's data payload.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &'static str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let mut descriptor = RequestDescriptor::new(method, path, body);
        let response = self.dispatch(&mut descriptor).await?;
        let envelope: Envelope<T> = Self::into_envelope(response).await?;
        envelope.into_data()
    }

    /// Issue a request to a message-only endpoint and return the
    /// envelope's message.
    async fn request_message(
        &self,
        method: Method,
        path: &'static str,
        body: Option<serde_json::Value>,
    ) -> Result<String> {
        let mut descriptor = RequestDescriptor::new(method, path, body);
        let response = self.dispatch(&mut descriptor).await?;
        let envelope: Envelope<serde_json::Value> = Self::into_envelope(response).await?;
        Ok(envelope.message)
    }

    /// Probe `GET /api/health`; unreachable counts as unhealthy.
    pub async fn health(&self) -> Result<bool> {
        let descriptor = RequestDescriptor::new(Method::GET, HEALTH_PATH, None);
        match self.send_raw(&descriptor, None).await {
            Ok(response) => Ok(response.status().is_success()),
            Err(err) if err.is_connection() || err.is_timeout() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Register a new account.
    pub async fn signup(&self, request: &SignupRequest) -> Result<String> {
        let body = serde_json::to_value(request)?;
        self.request_message(Method::POST, SIGNUP_PATH, Some(body))
            .await
    }

    /// Log in and persist the issued credential pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens> {
        let body = serde_json::to_value(LoginRequest::new(email, password))?;
        let tokens: AuthTokens = self.request(Method::POST, LOGIN_PATH, Some(body)).await?;
        self.store.set(&tokens.access_token, &tokens.refresh_token);
        tracing::info!("logged in");
        Ok(tokens)
    }

    /// Invalidate the server-side session and clear stored credentials.
    pub async fn logout(&self) -> Result<()> {
        let Some(tokens) = self.store.get() else {
            return Err(Error::NoRefreshToken);
        };
        let body = serde_json::to_value(LogoutRequest::new(&tokens.refresh_token))?;
        self.request_message(Method::POST, LOGOUT_PATH, Some(body))
            .await?;
        self.store.clear();
        tracing::info!("logged out");
        Ok(())
    }

    /// Delete the account and clear stored credentials.
    pub async fn withdraw(&self) -> Result<()> {
        self.request_message(Method::DELETE, WITHDRAW_PATH, None)
            .await?;
        self.store.clear();
        tracing::info!("account withdrawn");
        Ok(())
    }

    /// Fetch the public profile of the logged-in user.
    pub async fn profile(&self) -> Result<ProfileResponse> {
        self.request(Method::GET, PROFILE_PATH, None).await
    }

    /// Update nickname and profile image.
    pub async fn update_profile(&self, request: &ProfileUpdateRequest) -> Result<ProfileResponse> {
        let body = serde_json::to_value(request)?;
        self.request(Method::PUT, PROFILE_PATH, Some(body)).await
    }

    /// Fetch the full account record, contact fields included.
    pub async fn user_details(&self) -> Result<UserDetailsResponse> {
        self.request(Method::GET, USER_DETAILS_PATH, None).await
    }

    /// Change the login email. The server invalidates the session on
    /// success; callers should clear credentials and re-authenticate.
    pub async fn update_email(&self, request: &EmailUpdateRequest) -> Result<EmailResponse> {
        let body = serde_json::to_value(request)?;
        self.request(Method::PUT, EMAIL_PATH, Some(body)).await
    }

    /// Change the phone number.
    pub async fn update_phone_number(
        &self,
        request: &PhoneNumberUpdateRequest,
    ) -> Result<PhoneNumberResponse> {
        let body = serde_json::to_value(request)?;
        self.request(Method::PUT, PHONE_NUMBER_PATH, Some(body))
            .await
    }

    /// Change the password. The server invalidates the session on
    /// success; callers should clear credentials and re-authenticate.
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<String> {
        let body = serde_json::to_value(request)?;
        self.request_message(Method::PUT, PASSWORD_PATH, Some(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn memory_store() -> Arc<dyn CredentialStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_client_creation() {
        let client =
            ApiClient::with_options(memory_store(), Some("http://api.example.com".into()), None)
                .unwrap();
        assert_eq!(client.base_url(), "http://api.example.com");
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);

        let client = ApiClient::with_options(
            memory_store(),
            Some("http://api.example.com/".into()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://api.example.com");
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let result = ApiClient::with_options(memory_store(), Some("not a url".into()), None);
        assert!(matches!(result, Err(Error::Url { .. })));
    }

    #[test]
    fn test_is_authenticated_follows_store() {
        let store = Arc::new(MemoryStore::new());
        let client =
            ApiClient::with_options(store.clone(), Some("http://localhost:8080".into()), None)
                .unwrap();
        assert!(!client.is_authenticated());
        store.set("A1", "R1");
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_descriptor_starts_unretried() {
        let descriptor = RequestDescriptor::new(Method::GET, PROFILE_PATH, None);
        assert!(!descriptor.retried);
    }
}
