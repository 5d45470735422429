//! Session state and the authenticated request executor.
//!
//! [`Session`] is the per-caller state for talking to the FleetCloud API:
//! a `reqwest::Client` transport, the API base URL, and the current
//! authentication state (token plus decoded claims) once
//! [`login`](crate::auth::login) has succeeded.
//!
//! Request pipeline, applied identically by every endpoint module:
//! - the encoded query string is appended to the path when filter
//!   parameters are present;
//! - `Authorization: Bearer <token>` is attached iff a token is held —
//!   with no token the header is simply absent, and the server (not this
//!   client) enforces authentication;
//! - the full response body is read, then the status is classified:
//!   exactly `200 OK` and `201 Created` are success, anything else becomes
//!   [`Error::Api`] carrying the status, resolved URI, and body text.
//!
//! There are no retries, no caching, and no automatic token refresh: a
//! stale token surfaces as a server-rejected request. Concurrent use of
//! one `Session` from multiple tasks is not supported — `login` takes
//! `&mut self`, so the borrow checker enforces external serialization.

use reqwest::{header, Client, Method, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::auth::Claims;
use crate::error::{Error, Result};
use crate::query::QueryParams;

/// Default FleetCloud API host. Overridable per session for tests and
/// on-premise deployments.
const BASE_URL: &str = "https://api.fleetcloud.io";

/// Connect timeout for API calls. Covers TCP + TLS handshake only.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout, including response body download. API
/// responses are small JSON documents, so 30 seconds is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the `reqwest::Client` used for all session traffic.
///
/// Redirects are disabled: the authentication endpoint must never follow
/// one (credentials would be re-sent to the redirect target), and the
/// resource endpoints do not redirect in normal operation.
fn build_transport() -> Client {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build HTTP client for the FleetCloud API")
}

/// Token and decoded claims, stored as one unit.
///
/// Keeping the pair in a single value means a session can never hold a
/// token from one login and claims from another: [`crate::auth::login`]
/// replaces the whole state or none of it.
#[derive(Debug, Clone)]
pub(crate) struct AuthState {
    pub(crate) token: String,
    pub(crate) claims: Claims,
}

/// Per-caller session for the FleetCloud API.
///
/// Created anonymous; [`crate::auth::login`] moves it to the
/// authenticated state, and a later login replaces the token. There is no
/// logout — the state lives as long as the value does.
pub struct Session {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) auth: Option<AuthState>,
}

impl Session {
    /// Creates an anonymous session against the production API host.
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Creates an anonymous session against a custom base URL, used by
    /// tests to point at a local mock server instead of the real API.
    pub fn with_base_url(base_url: &str) -> Self {
        Session {
            client: build_transport(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: None,
        }
    }

    /// Creates a session with a pre-set token, bypassing the login flow.
    /// Used by tests to avoid real authentication round trips. Claims are
    /// left at their default (empty) values.
    pub fn with_token(base_url: &str, token: &str) -> Self {
        let mut session = Self::with_base_url(base_url);
        session.auth = Some(AuthState {
            token: token.to_string(),
            claims: Claims::default(),
        });
        session
    }

    /// The current session token, if a login has succeeded.
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|state| state.token.as_str())
    }

    /// The claims decoded from the current token, if a login has succeeded.
    pub fn claims(&self) -> Option<&Claims> {
        self.auth.as_ref().map(|state| &state.claims)
    }

    /// Replaces the token/claims pair in one step.
    pub(crate) fn set_auth(&mut self, token: String, claims: Claims) {
        self.auth = Some(AuthState { token, claims });
    }

    /// Resolves a resource path against the session's base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Sends one request and returns the raw response body bytes.
    ///
    /// `params`, when present and non-empty, is encoded and appended as
    /// the query string. `body`, when present, is serialized as JSON but
    /// no `Content-Type` header is forced — use [`send_json`] for that.
    ///
    /// # Errors
    ///
    /// - [`Error::Api`] — status outside {200, 201}; carries the status,
    ///   the resolved URI, and the response body text.
    /// - [`Error::Network`] — the request could not be sent or the body
    ///   could not be read.
    /// - [`Error::Parse`] — the request body could not be serialized.
    ///
    /// [`send_json`]: Session::send_json
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        self.dispatch(method, path, params, body, false).await
    }

    /// Identical to [`send`](Session::send) but forces the request
    /// `Content-Type` header to `application/json`. Every JSON-producing
    /// or JSON-consuming endpoint goes through here.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        self.dispatch(method, path, params, body, true).await
    }

    /// Core sender: builds the URI, attaches auth and body, executes one
    /// round trip, and classifies the response status.
    async fn dispatch<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<&B>,
        force_json: bool,
    ) -> Result<Vec<u8>> {
        let mut uri = self.endpoint(path);
        if let Some(params) = params {
            if !params.is_empty() {
                uri.push('?');
                uri.push_str(&params.encode());
            }
        }

        let mut request = self.client.request(method.clone(), &uri);
        if let Some(state) = &self.auth {
            request = request.bearer_auth(&state.token);
        }
        if force_json {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(payload) = body {
            request = request.body(serde_json::to_vec(payload)?);
        }

        debug!(%method, %uri, "dispatching API request");
        let response = request.send().await?;

        // Read the body before classifying the status so error responses
        // keep the server's diagnostic text.
        let status = response.status();
        let text = response.text().await?;

        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            return Err(Error::Api {
                status,
                uri,
                body: text,
            });
        }
        Ok(text.into_bytes())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
