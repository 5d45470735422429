//! Async Rust client library for the FleetCloud device-management REST API.
//!
//! Provides username/password authentication with decoded session-token
//! claims, an authenticated request executor with deterministic filter
//! encoding, and typed accessors for the application and device resources.
//!
//! # Modules
//!
//! - [`applications`] — application lookup, creation, deletion, API keys.
//! - [`auth`] — credential exchange, token claims decoding, login.
//! - [`client`] — the [`Session`](client::Session) state and request executor.
//! - [`devices`] — device lookup, registration, deletion.
//! - [`error`] — typed error hierarchy ([`Error`](error::Error)) for all operations.
//! - [`query`] — deterministic query-string encoding for list filters.
//!
//! # Quick Start
//!
//! ```ignore
//! use fleetcloud::auth::{login, Credentials};
//! use fleetcloud::client::Session;
//! use fleetcloud::applications::list_applications;
//!
//! let mut session = Session::new();
//! let credentials = Credentials {
//!     username: "alice".to_string(),
//!     email: "alice@example.com".to_string(),
//!     password: "secret".to_string(),
//! };
//! login(&mut session, &credentials).await?;
//! let apps = list_applications(&session).await?;
//! ```
//!
//! One `Session` serves one caller: `login` takes `&mut self`, requests
//! take `&self`, and sharing a session across tasks requires external
//! serialization.

#![warn(missing_docs)]

pub mod applications;
pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod query;
