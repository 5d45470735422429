//! Typed error hierarchy for the fleetcloud crate.
//!
//! Every variant carries enough raw context (status code, resolved URI,
//! response body, or the malformed token text) to diagnose a failure
//! without re-running under a debugger. The library performs no recovery
//! or retry of its own: each error is returned to the immediate caller
//! uninterpreted, and backoff policy is the caller's responsibility.
//!
//! Variant boundaries:
//! - `Auth` covers the authentication endpoint rejecting credentials.
//! - `Api` covers every other non-success HTTP status from the API.
//! - `Token` covers structurally malformed session tokens.
//! - `NotFound` is synthesized locally when a filtered lookup matches
//!   nothing, so callers can tell "no such resource" apart from a server
//!   error.
//! - `Parse` wraps `serde_json::Error` for unexpected response shapes.
//! - `Network` wraps `reqwest::Error` for transport failures (DNS, TCP,
//!   TLS) where no HTTP status code exists.

use reqwest::StatusCode;

/// Unified error type for all fleetcloud library operations.
///
/// The `#[source]`/`#[from]` attributes on wrapped errors enable
/// `Error::source()` chaining so callers and logging frameworks can
/// traverse the full cause chain.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The authentication endpoint returned a non-success status.
    ///
    /// `body` is the server's response text verbatim — FleetCloud returns
    /// a human-readable reason (bad password, unknown user, disabled
    /// account) that would otherwise be lost.
    #[error("authentication failed ({status}): {body}")]
    Auth {
        /// HTTP status code returned by the authentication endpoint.
        status: StatusCode,
        /// Raw response body text from the server.
        body: String,
    },

    /// The API returned a status outside the success set ({200, 201}).
    ///
    /// Carries the resolved request URI (including any encoded query
    /// string) and the full response body so tests and callers can assert
    /// on exact failure content.
    #[error("API error {status} at {uri}: {body}")]
    Api {
        /// HTTP status code of the response.
        status: StatusCode,
        /// The fully resolved request URI.
        uri: String,
        /// Raw response body text. Empty if the body could not be read.
        body: String,
    },

    /// A session token could not be decoded into claims.
    ///
    /// The token text is included so the malformed input is visible in
    /// logs; tokens here are opaque session strings, not secrets derived
    /// from the password.
    #[error("malformed session token {token:?}: {reason}")]
    Token {
        /// The token string that failed to decode.
        token: String,
        /// What was wrong with it (segment count, base64, claims JSON).
        reason: String,
    },

    /// A filtered lookup returned zero records.
    ///
    /// Synthesized locally, never a raw HTTP error — the server answered
    /// 200 with an empty collection.
    #[error("{resource} not found: {key}")]
    NotFound {
        /// The resource kind that was looked up (`"application"`, `"device"`).
        resource: &'static str,
        /// The natural-key value that matched nothing.
        key: String,
    },

    /// JSON deserialization failed when parsing a response body.
    #[error("failed to decode response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A network-level failure occurred before a status code was available
    /// (DNS resolution, TCP connect, TLS handshake, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
