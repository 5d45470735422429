//! Application lookup and management for the FleetCloud API.
//!
//! This module covers the `application` endpoint family:
//!
//! - [`list_applications`] — retrieve every application owned by the
//!   logged-in account.
//! - [`get_application_by_name`] / [`get_application_by_id`] — filtered
//!   single-item lookups.
//! - [`create_application`] — create an application for a device type.
//! - [`delete_application`] — delete by name.
//! - [`generate_api_key`] — provision an API key for a named application.
//!
//! ## Filtering
//!
//! List endpoints are narrowed with the API's equality-filter convention,
//! two reserved query parameters: `filter=<fieldName>&eq=<value>`. A
//! filtered lookup that matches nothing yields [`Error::NotFound`] rather
//! than an empty record, so callers can tell "no such application" apart
//! from a server error.
//!
//! ## Envelope
//!
//! List responses arrive wrapped as `{ "d": [...] }`; create responses
//! are the bare JSON object.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Session;
use crate::error::{Error, Result};
use crate::query::QueryParams;

// ── Response types ─────────────────────────────────────────────────────

/// Owner of an application, as embedded in application records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned numeric account ID.
    #[serde(default)]
    pub id: i64,

    /// Account username.
    #[serde(default)]
    pub username: Option<String>,
}

/// An application registered on FleetCloud.
///
/// Field names follow the API's snake_case wire contract (`app_name`,
/// `git_repository`). Optional fields are those the API may omit
/// depending on whether the application has ever been pushed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Server-assigned numeric application ID.
    pub id: i64,

    /// Application name, unique per account.
    #[serde(rename = "app_name")]
    pub name: String,

    /// Git remote to push application code to.
    #[serde(rename = "git_repository", default)]
    pub repository: Option<String>,

    /// Device type this application targets (e.g. `"raspberry-pi3"`).
    #[serde(default)]
    pub device_type: Option<String>,

    /// Hash of the most recently pushed commit, once one exists.
    #[serde(default)]
    pub commit: Option<String>,

    /// The owning account.
    #[serde(default)]
    pub user: Option<User>,
}

/// Collection wrapper used by every list/query endpoint: `{ "d": [...] }`.
///
/// Generic so [`crate::devices`] can reuse it for device collections.
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    /// The array of result items.
    pub d: Vec<T>,
}

// ── Request types ──────────────────────────────────────────────────────

/// Request body for POST `application`.
#[derive(Debug, Serialize)]
pub struct CreateApplicationRequest<'a> {
    /// Name for the new application.
    pub app_name: &'a str,
    /// Device type the application will target.
    pub device_type: &'a str,
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Retrieves all applications belonging to the logged-in account.
///
/// # Errors
///
/// - [`Error::Api`] — non-success HTTP status (e.g. 401 when the session
///   token is missing or stale).
/// - [`Error::Parse`] — the response was not the expected `{"d": [...]}`
///   shape.
/// - [`Error::Network`] — transport-level failure.
pub async fn list_applications(session: &Session) -> Result<Vec<Application>> {
    let body = session
        .send_json::<()>(Method::GET, "application", None, None)
        .await?;
    let list: Collection<Application> = serde_json::from_slice(&body)?;
    Ok(list.d)
}

/// Retrieves the application with the given name.
///
/// # Errors
///
/// - [`Error::NotFound`] — no application matched the name.
/// - Plus the [`list_applications`] error set.
pub async fn get_application_by_name(session: &Session, name: &str) -> Result<Application> {
    let params = QueryParams::eq_filter("app_name", name);
    first_match(session, &params, name).await
}

/// Retrieves the application with the given numeric ID.
///
/// # Errors
///
/// - [`Error::NotFound`] — no application matched the ID.
/// - Plus the [`list_applications`] error set.
pub async fn get_application_by_id(session: &Session, id: i64) -> Result<Application> {
    let params = QueryParams::eq_filter("id", &id.to_string());
    first_match(session, &params, &id.to_string()).await
}

/// Shared filtered-lookup body: fetch with the filter, return the first
/// record or a locally synthesized `NotFound`.
async fn first_match(session: &Session, params: &QueryParams, key: &str) -> Result<Application> {
    let body = session
        .send_json::<()>(Method::GET, "application", Some(params), None)
        .await?;
    let list: Collection<Application> = serde_json::from_slice(&body)?;
    list.d.into_iter().next().ok_or_else(|| Error::NotFound {
        resource: "application",
        key: key.to_string(),
    })
}

/// Creates an application with the given name and device type.
///
/// The response is the bare created [`Application`] object (not the
/// collection envelope).
///
/// # Errors
///
/// - [`Error::Api`] — non-success HTTP status (e.g. 400 for a name that
///   is already taken or an unknown device type).
/// - [`Error::Parse`] — the response was not an application object.
/// - [`Error::Network`] — transport-level failure.
pub async fn create_application(
    session: &Session,
    name: &str,
    device_type: &str,
) -> Result<Application> {
    let request = CreateApplicationRequest {
        app_name: name,
        device_type,
    };
    let body = session
        .send_json(Method::POST, "application", None, Some(&request))
        .await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Deletes the application with the given name.
///
/// Returns `true` iff the server answered with the literal body `"OK"`.
/// The status gate ({200, 201}) has already passed by then; a success
/// status with any other body yields `Ok(false)` rather than an error,
/// matching the API's delete contract exactly.
///
/// # Errors
///
/// - [`Error::Api`] — non-success HTTP status. Deleting a name that does
///   not exist surfaces the server's actual response; it is never
///   silently treated as success.
/// - [`Error::Network`] — transport-level failure.
pub async fn delete_application(session: &Session, name: &str) -> Result<bool> {
    let params = QueryParams::eq_filter("app_name", name);
    let body = session
        .send_json::<()>(Method::DELETE, "application", Some(&params), None)
        .await?;
    Ok(body.as_slice() == b"OK")
}

/// Provisions an API key for the named application.
///
/// Composes a name→ID lookup with POST
/// `application/{id}/generate-api-key` and returns the response body as
/// the key text.
///
/// # Errors
///
/// - [`Error::NotFound`] — no application matched the name.
/// - [`Error::Api`] — the key endpoint returned a non-success status.
/// - [`Error::Network`] — transport-level failure.
pub async fn generate_api_key(session: &Session, name: &str) -> Result<String> {
    let app = get_application_by_name(session, name).await?;
    let path = format!("application/{}/generate-api-key", app.id);
    let body = session.send_json::<()>(Method::POST, &path, None, None).await?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}
