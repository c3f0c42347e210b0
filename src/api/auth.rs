//! Auth Service Client
//!
//! JSON client for the account endpoints under `/api/auth`. The access token
//! and current user live in an in-memory session; every request carries the
//! token as a bearer header when one is held.
//!
//! A `401` while holding a token triggers one refresh (using the refresh
//! cookie kept by the client's cookie store) and one replay of the request.
//! Auth responses are returned as-is, including `success: false` bodies.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::{endpoint_url, error_from_response, transport_error};
use crate::config::Config;
use crate::constants::endpoints;
use crate::orchestration::{TimeoutConfig, with_timeout};
use crate::types::{AuthResponse, PhotomonixError, ProfileUpdate, Result, User};

/// Email and password for login
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// New account details
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Default)]
struct Session {
    access_token: Option<SecretString>,
    user: Option<User>,
}

/// Client for the auth service with an in-memory session
pub struct AuthClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
    session: RwLock<Session>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl AuthClient {
    /// `base_url` is the auth service root, e.g. `http://localhost:5000`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout + Duration::from_secs(5))
            .cookie_store(true)
            .build()
            .map_err(|e| PhotomonixError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            timeout,
            client,
            session: RwLock::new(Session::default()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.services.auth_url.clone(),
            TimeoutConfig::from(&config.timeouts).auth,
        )
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.read_session(|s| s.access_token.is_some())
    }

    /// Current access token, if any
    pub fn access_token(&self) -> Option<SecretString> {
        self.read_session(|s| {
            s.access_token
                .as_ref()
                .map(|t| SecretString::from(t.expose_secret().to_string()))
        })
    }

    pub fn set_access_token(&self, token: impl Into<String>) {
        self.write_session(|s| s.access_token = Some(SecretString::from(token.into())));
    }

    /// User from the last login, verification or profile update
    pub fn user(&self) -> Option<User> {
        self.read_session(|s| s.user.clone())
    }

    /// Drop token and user
    pub fn clear_session(&self) {
        self.write_session(|s| *s = Session::default());
    }

    fn read_session<T>(&self, f: impl FnOnce(&Session) -> T) -> T {
        f(&self.session.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write_session(&self, f: impl FnOnce(&mut Session)) {
        f(&mut self.session.write().unwrap_or_else(PoisonError::into_inner));
    }

    fn bearer(&self) -> Option<String> {
        self.read_session(|s| {
            s.access_token
                .as_ref()
                .map(|t| format!("Bearer {}", t.expose_secret()))
        })
    }

    /// Store token (and user, when present) from a successful response
    fn store_login(&self, response: &AuthResponse) {
        if !response.success {
            return;
        }
        if let Some(token) = response.access_token() {
            let user = response.user().cloned();
            self.write_session(|s| {
                s.access_token = Some(SecretString::from(token.to_string()));
                if user.is_some() {
                    s.user = user;
                }
            });
        }
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, &format!("{}{}", endpoints::AUTH_PREFIX, path))
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let mut builder = self.client.request(method.clone(), self.url(path));
        if let Some(bearer) = self.bearer() {
            builder = builder.header(reqwest::header::AUTHORIZATION, bearer);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        with_timeout(
            self.timeout,
            async { builder.send().await.map_err(transport_error) },
            "Auth service is not responding",
        )
        .await
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<AuthResponse> {
        let had_token = self.is_authenticated();
        debug!(method = %method, path, authenticated = had_token, "Auth request");

        let mut response = self.send(&method, path, body.as_ref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && had_token {
            debug!(path, "Access token rejected, refreshing");
            if self.refresh().await && self.is_authenticated() {
                response = self.send(&method, path, body.as_ref()).await?;
            }
        }

        Self::parse(response).await
    }

    async fn parse(response: reqwest::Response) -> Result<AuthResponse> {
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        match serde_json::from_str::<AuthResponse>(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(PhotomonixError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Auth request failed"),
            )),
            Err(e) => {
                debug!(error = %e, "Auth body did not parse");
                Err(PhotomonixError::InvalidResponse("auth service".to_string()))
            }
        }
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        self.request(Method::POST, "/register", Some(serde_json::to_value(registration)?))
            .await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let response = self
            .request(Method::POST, "/login", Some(serde_json::to_value(credentials)?))
            .await?;
        self.store_login(&response);
        if response.success {
            info!(email = %credentials.email, "Logged in");
        }
        Ok(response)
    }

    pub async fn logout(&self) -> Result<AuthResponse> {
        let response = self.request(Method::POST, "/logout", None).await?;
        if response.success {
            self.clear_session();
            info!("Logged out");
        }
        Ok(response)
    }

    pub async fn verify_email(&self, token: &str) -> Result<AuthResponse> {
        let response = self
            .request(Method::POST, "/verify-email", Some(json!({ "token": token })))
            .await?;
        self.store_login(&response);
        Ok(response)
    }

    pub async fn resend_verification(&self, email: &str) -> Result<AuthResponse> {
        self.request(
            Method::POST,
            "/resend-verification",
            Some(json!({ "email": email })),
        )
        .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<AuthResponse> {
        self.request(Method::POST, "/forgot-password", Some(json!({ "email": email })))
            .await
    }

    /// Complete a reset from an emailed token. Stores the returned token only.
    pub async fn reset_password_with_token(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<AuthResponse> {
        let body = json!({
            "token": token,
            "newPassword": new_password,
            "confirmPassword": confirm_password,
        });
        let response = self
            .request(Method::POST, "/reset-password-with-token", Some(body))
            .await?;
        if response.success
            && let Some(token) = response.access_token()
        {
            self.set_access_token(token);
        }
        Ok(response)
    }

    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<AuthResponse> {
        let body = json!({ "email": email, "newPassword": new_password });
        self.request(Method::POST, "/reset-password", Some(body)).await
    }

    pub async fn profile(&self) -> Result<AuthResponse> {
        self.request(Method::GET, "/profile", None).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthResponse> {
        let response = self
            .request(Method::PUT, "/update-profile", Some(serde_json::to_value(update)?))
            .await?;
        if response.success
            && let Some(user) = response.user().cloned()
        {
            self.write_session(|s| s.user = Some(user));
        }
        Ok(response)
    }

    /// Exchange the refresh cookie for a new access token.
    ///
    /// Returns whether a new token was stored. Failures are logged, not raised.
    pub async fn refresh(&self) -> bool {
        let outcome: Result<AuthResponse> = async {
            let response = with_timeout(
                self.timeout,
                async {
                    self.client
                        .post(self.url("/refresh"))
                        .send()
                        .await
                        .map_err(transport_error)
                },
                "Token refresh is not responding",
            )
            .await?;

            if !response.status().is_success() && response.status() != StatusCode::UNAUTHORIZED {
                return Err(error_from_response(response, "Token refresh failed").await);
            }
            Self::parse(response).await
        }
        .await;

        match outcome {
            Ok(response) if response.success => match response.access_token() {
                Some(token) => {
                    self.set_access_token(token);
                    debug!("Access token refreshed");
                    true
                }
                None => false,
            },
            Ok(response) => {
                debug!(message = %response.summary(), "Token refresh rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AuthClient {
        AuthClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_session_lifecycle() {
        let auth = client();
        assert!(!auth.is_authenticated());
        assert!(auth.access_token().is_none());

        auth.set_access_token("abc");
        assert!(auth.is_authenticated());
        assert_eq!(auth.access_token().unwrap().expose_secret(), "abc");
        assert_eq!(auth.bearer().as_deref(), Some("Bearer abc"));

        auth.clear_session();
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let auth = client();
        auth.set_access_token("super-secret");
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("authenticated: true"));
    }

    #[test]
    fn test_url_includes_prefix() {
        let auth = AuthClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(auth.url("/login"), "http://localhost:5000/api/auth/login");
    }

    #[test]
    fn test_store_login_requires_success() {
        let auth = client();
        let failed: AuthResponse = serde_json::from_value(json!({
            "success": false,
            "message": "nope",
            "data": { "accessToken": "t" }
        }))
        .unwrap();
        auth.store_login(&failed);
        assert!(!auth.is_authenticated());

        let ok: AuthResponse = serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "data": {
                "accessToken": "t",
                "user": { "id": "1", "name": "Ana", "email": "ana@example.com", "emailVerified": true }
            }
        }))
        .unwrap();
        auth.store_login(&ok);
        assert!(auth.is_authenticated());
        assert_eq!(auth.user().unwrap().email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_refresh_unreachable_is_false() {
        let auth = client();
        assert!(!auth.refresh().await);
    }
}
