//! Credential exchange and session-token handling for the FleetCloud API.
//!
//! [`authenticate`] trades a username/password pair for a signed session
//! token at the `login_` endpoint. [`parse_token`] decodes the token's
//! claims segment, and [`login`] composes the two and stores the result
//! in the [`Session`].
//!
//! Token lifecycle: created by a successful [`login`], read by every
//! subsequent authenticated request, replaced only by another explicit
//! [`login`]. The client performs no expiry tracking and no refresh — a
//! stale token surfaces as a server-rejected request.
//!
//! Claims decoding is informational, not cryptographic: the payload
//! segment is base64url JSON and this client never verifies the
//! signature. Verification is the server's job on every request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::Session;
use crate::error::{Error, Result};

/// Login credentials for a FleetCloud account.
///
/// An immutable input value: the password is sent to the authentication
/// endpoint and never stored in the session. `email` identifies the
/// account at signup and is carried for completeness; the login flow
/// itself authenticates by username.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account username, also the subject claim of issued tokens.
    pub username: String,
    /// Account email address. Not sent by the login flow.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Form body sent to the `login_` endpoint.
/// Serialized as `application/x-www-form-urlencoded` by reqwest's `.form()`.
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Identity fields decoded from a session token's payload segment.
///
/// The server embeds more claims than this; unknown fields are ignored so
/// the client keeps working when new ones appear.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Server-assigned numeric account ID.
    #[serde(default)]
    pub id: i64,
    /// Account username — the subject of the token.
    pub username: String,
    /// Account email address, when embedded by the server.
    #[serde(default)]
    pub email: Option<String>,
    /// Unix timestamp at which the token was issued.
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Exchanges credentials for a raw session token.
///
/// POSTs the username and password as a form body to `{base}/login_`
/// over the session transport (TLS, redirects disabled — see
/// [`Session`]). On success the entire response body is the token. The
/// session itself is not modified; use [`login`] to store the result.
///
/// # Errors
///
/// - [`Error::Auth`] — the endpoint returned a non-success status; the
///   status code and the server's response body are carried verbatim.
/// - [`Error::Network`] — the request could not be sent or the body
///   could not be read.
pub async fn authenticate(session: &Session, credentials: &Credentials) -> Result<String> {
    let form = LoginRequest {
        username: &credentials.username,
        password: &credentials.password,
    };
    let uri = session.endpoint("login_");

    let response = session.client.post(&uri).form(&form).send().await?;

    // Read the body before checking the status so the server's rejection
    // reason is preserved in the error.
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::Auth { status, body });
    }
    Ok(body)
}

/// Decodes the claims from a session token without verifying it.
///
/// The token must be the three-segment dot-delimited form
/// `header.payload.signature`; only the payload segment is read, as
/// unpadded base64url JSON.
///
/// # Errors
///
/// [`Error::Token`] — wrong segment count, payload not valid base64url,
/// or claims not valid JSON. The malformed token text is included.
pub fn parse_token(token: &str) -> Result<Claims> {
    let malformed = |reason: String| Error::Token {
        token: token.to_string(),
        reason,
    };

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(malformed(format!(
            "expected 3 dot-separated segments, found {}",
            segments.len()
        )));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1])
        .map_err(|err| malformed(format!("payload is not valid base64url: {err}")))?;

    serde_json::from_slice(&payload)
        .map_err(|err| malformed(format!("claims are not valid JSON: {err}")))
}

/// Authenticates and stores the token plus its decoded claims in the
/// session.
///
/// The token/claims pair is written as one unit only after both the
/// exchange and the decode succeed: a caller observing the session sees
/// either the previous pair or the new one, never a mix. On any failure
/// the session is left unmodified.
///
/// # Errors
///
/// Propagates [`authenticate`] and [`parse_token`] errors unchanged.
pub async fn login(session: &mut Session, credentials: &Credentials) -> Result<()> {
    let token = authenticate(session, credentials).await?;
    let claims = parse_token(&token)?;
    info!(username = %claims.username, "session authenticated");
    session.set_auth(token, claims);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_token ──────────────────────────────────────────────────

    #[test]
    fn parse_token_decodes_username_claim() {
        // Payload segment is {"username":"alice"} in unpadded base64url.
        let token = "eyJhbGciOiJIUzI1NiJ9.eyJ1c2VybmFtZSI6ImFsaWNlIn0.sig";
        let claims = parse_token(token).unwrap();
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn parse_token_decodes_full_claims() {
        // {"id":42,"username":"alice","email":"alice@example.com","iat":1500000000}
        let payload = URL_SAFE_NO_PAD.encode(
            r#"{"id":42,"username":"alice","email":"alice@example.com","iat":1500000000}"#,
        );
        let token = format!("hdr.{payload}.sig");
        let claims = parse_token(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.iat, Some(1_500_000_000));
    }

    #[test]
    fn parse_token_ignores_unknown_claims() {
        let payload =
            URL_SAFE_NO_PAD.encode(r#"{"username":"bob","jwt_secret":"x","features":[1,2]}"#);
        let token = format!("hdr.{payload}.sig");
        let claims = parse_token(&token).unwrap();
        assert_eq!(claims.username, "bob");
        assert_eq!(claims.id, 0, "absent id should default to zero");
    }

    #[test]
    fn parse_token_rejects_wrong_segment_count() {
        let err = parse_token("only-one-segment").unwrap_err();
        let msg = err.to_string();
        assert!(
            msg.contains("only-one-segment"),
            "error should show the malformed token, got: {msg}"
        );
        assert!(msg.contains("found 1"), "error should count segments");

        assert!(
            parse_token("a.b.c.d").is_err(),
            "four segments must be rejected"
        );
    }

    #[test]
    fn parse_token_rejects_undecodable_payload() {
        let err = parse_token("hdr.!!!not-base64!!!.sig").unwrap_err();
        assert!(
            err.to_string().contains("base64url"),
            "error should name the base64 failure"
        );
    }

    #[test]
    fn parse_token_rejects_non_json_claims() {
        let payload = URL_SAFE_NO_PAD.encode("plain text, not json");
        let err = parse_token(&format!("hdr.{payload}.sig")).unwrap_err();
        assert!(
            err.to_string().contains("JSON"),
            "error should name the JSON failure"
        );
    }

    // ── request serialization ────────────────────────────────────────

    #[test]
    fn login_request_serializes_as_form() {
        let form = LoginRequest {
            username: "alice",
            password: "p@ss word",
        };
        let encoded = serde_urlencoded::to_string(&form).unwrap();
        assert!(encoded.contains("username=alice"));
        // Form encoding escapes the password's reserved characters.
        assert!(encoded.contains("password=p%40ss+word"));
    }
}
