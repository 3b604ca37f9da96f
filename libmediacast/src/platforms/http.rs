//! Shared HTTP plumbing for the vendor adapters

use reqwest::{Client, Response};
use serde_json::Value;

use crate::error::PlatformError;

const USER_AGENT: &str = concat!("mediacast/", env!("CARGO_PKG_VERSION"));

pub(crate) fn client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Read a vendor response body as JSON.
///
/// Non-2xx statuses are transport failures carrying the status and body.
/// A 2xx body that is not JSON is handed back raw as an API failure.
pub(crate) async fn read_json(response: Response) -> Result<Value, PlatformError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(PlatformError::Network(format!("HTTP {}: {}", status, body)));
    }

    serde_json::from_str(&body).map_err(|_| PlatformError::Api(body))
}

/// Fetch an identifier field, accepting both string and numeric ids.
pub(crate) fn id_field(body: &Value, pointer: &str) -> Option<String> {
    match body.pointer(pointer)? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
