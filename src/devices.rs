//! Device lookup and registration for the FleetCloud API.
//!
//! This module covers the `device` endpoint family:
//!
//! - [`list_devices`] — retrieve every device visible to the account.
//! - [`get_device_by_uuid`] / [`get_device_by_name`] — filtered lookups.
//! - [`register_device`] — attach a new device to a named application.
//! - [`delete_device`] — delete by UUID.
//!
//! Devices are addressed by a client-supplied UUID: registration never
//! asks the server to generate one. [`generate_uuid`] produces the
//! expected 32-character lowercase-hex form.
//!
//! Filtering and the `{ "d": [...] }` envelope work exactly as for
//! applications; see [`crate::applications`].

use reqwest::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::{get_application_by_name, Collection};
use crate::client::Session;
use crate::error::{Error, Result};
use crate::query::QueryParams;

// ── Response types ─────────────────────────────────────────────────────

/// A device registered on FleetCloud.
///
/// Field names follow the API's snake_case wire contract. Optional
/// fields are those the API omits until the device has come online at
/// least once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Server-assigned numeric device ID.
    pub id: i64,

    /// Human-readable device name, generated by the server at
    /// registration and renameable afterwards.
    #[serde(default)]
    pub name: String,

    /// Client-supplied unique identifier, 32 lowercase hex characters.
    /// The natural key for lookups and deletion.
    pub uuid: String,

    /// Device type (e.g. `"raspberry-pi3"`), inherited from the
    /// application the device was registered against.
    #[serde(default)]
    pub device_type: Option<String>,

    /// Whether the device currently holds a connection to FleetCloud.
    #[serde(default)]
    pub is_online: bool,

    /// Last reported VPN/local IP address.
    #[serde(default)]
    pub ip_address: Option<String>,

    /// Provisioning state reported by the device supervisor
    /// (e.g. `"Idle"`, `"Downloading"`).
    #[serde(default)]
    pub status: Option<String>,

    /// Hash of the commit the device is currently running.
    #[serde(default)]
    pub commit: Option<String>,

    /// ISO 8601 timestamp of the device's last contact.
    #[serde(default)]
    pub last_seen_time: Option<String>,

    /// Free-form note attached to the device.
    #[serde(default)]
    pub note: Option<String>,
}

// ── Request types ──────────────────────────────────────────────────────

/// Request body for POST `device`.
#[derive(Debug, Serialize)]
pub struct RegisterDeviceRequest<'a> {
    /// Numeric ID of the application the device joins.
    pub application: i64,

    /// Client-generated device UUID.
    pub uuid: &'a str,

    /// Device type, normally the owning application's. Omitted when the
    /// application record did not carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<&'a str>,
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Generates a device UUID in the form the API expects: 32 lowercase
/// hex characters, no hyphens.
pub fn generate_uuid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Retrieves all devices visible to the logged-in account.
///
/// # Errors
///
/// - [`Error::Api`] — non-success HTTP status.
/// - [`Error::Parse`] — the response was not the expected `{"d": [...]}`
///   shape.
/// - [`Error::Network`] — transport-level failure.
pub async fn list_devices(session: &Session) -> Result<Vec<Device>> {
    let body = session
        .send_json::<()>(Method::GET, "device", None, None)
        .await?;
    let list: Collection<Device> = serde_json::from_slice(&body)?;
    Ok(list.d)
}

/// Retrieves the device with the given UUID.
///
/// # Errors
///
/// - [`Error::NotFound`] — no device matched the UUID.
/// - Plus the [`list_devices`] error set.
pub async fn get_device_by_uuid(session: &Session, uuid: &str) -> Result<Device> {
    let params = QueryParams::eq_filter("uuid", uuid);
    first_match(session, &params, uuid).await
}

/// Retrieves the device with the given name.
///
/// # Errors
///
/// - [`Error::NotFound`] — no device matched the name.
/// - Plus the [`list_devices`] error set.
pub async fn get_device_by_name(session: &Session, name: &str) -> Result<Device> {
    let params = QueryParams::eq_filter("name", name);
    first_match(session, &params, name).await
}

/// Shared filtered-lookup body, mirroring the applications module.
async fn first_match(session: &Session, params: &QueryParams, key: &str) -> Result<Device> {
    let body = session
        .send_json::<()>(Method::GET, "device", Some(params), None)
        .await?;
    let list: Collection<Device> = serde_json::from_slice(&body)?;
    list.d.into_iter().next().ok_or_else(|| Error::NotFound {
        resource: "device",
        key: key.to_string(),
    })
}

/// Registers a new device under the named application.
///
/// Resolves the application by name, then POSTs a registration carrying
/// the caller-supplied `uuid` (see [`generate_uuid`]) and the
/// application's device type. The response is the bare created
/// [`Device`] object.
///
/// # Errors
///
/// - [`Error::NotFound`] — no application matched `app_name`.
/// - [`Error::Api`] — the registration was rejected (e.g. 400 for a
///   malformed or already-registered UUID).
/// - [`Error::Parse`] — the response was not a device object.
/// - [`Error::Network`] — transport-level failure.
pub async fn register_device(session: &Session, app_name: &str, uuid: &str) -> Result<Device> {
    let app = get_application_by_name(session, app_name).await?;
    let request = RegisterDeviceRequest {
        application: app.id,
        uuid,
        device_type: app.device_type.as_deref(),
    };
    let body = session
        .send_json(Method::POST, "device", None, Some(&request))
        .await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Deletes the device with the given UUID.
///
/// Returns `true` iff the server answered with the literal body `"OK"`,
/// under the same contract as
/// [`delete_application`](crate::applications::delete_application).
///
/// # Errors
///
/// - [`Error::Api`] — non-success HTTP status. Deleting a UUID that does
///   not exist surfaces the server's actual response; it is never
///   silently treated as success.
/// - [`Error::Network`] — transport-level failure.
pub async fn delete_device(session: &Session, uuid: &str) -> Result<bool> {
    let params = QueryParams::eq_filter("uuid", uuid);
    let body = session
        .send_json::<()>(Method::DELETE, "device", Some(&params), None)
        .await?;
    Ok(body.as_slice() == b"OK")
}
