//! Serde types matching LegiScan API envelopes.
//!
//! Every response is a JSON object with a top-level `status` and exactly one
//! payload key. Payloads are mostly passed through as opaque objects; only the
//! parts the client interprets get a typed shape here.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{LegiScanError, Result};

/// Top-level status marker shared by all responses.
#[derive(Debug, Deserialize)]
pub struct ApiStatus {
  #[serde(default)]
  pub status: Option<String>,
  pub alert: Option<ApiAlert>,
}

#[derive(Debug, Deserialize)]
pub struct ApiAlert {
  #[serde(default)]
  pub message: Option<String>,
}

impl ApiStatus {
  pub fn is_error(&self) -> bool {
    self.status.as_deref() == Some("ERROR")
  }

  /// Upstream error message, if the envelope supplied one.
  pub fn message(&self) -> String {
    self
      .alert
      .as_ref()
      .and_then(|a| a.message.clone())
      .unwrap_or_else(|| "LegiScan API returned an error without a message".to_string())
  }
}

/// Take `key` out of a response object and deserialize it.
pub fn take_field<T: DeserializeOwned>(data: &mut Value, key: &'static str) -> Result<T> {
  let value = data
    .get_mut(key)
    .map(Value::take)
    .ok_or(LegiScanError::MissingField(key))?;
  Ok(serde_json::from_value(value)?)
}

// ============================================================================
// getSponsor
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSponsor {
  pub name: String,
  /// Vote Smart candidate id. Sent as either a number or a string.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub votesmart_id: Option<Value>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl ApiSponsor {
  /// The Vote Smart id rendered for use in a URL path.
  pub fn votesmart_id(&self) -> Option<String> {
    match self.votesmart_id.as_ref()? {
      Value::String(s) => Some(s.clone()),
      Value::Number(n) => Some(n.to_string()),
      _ => None,
    }
  }
}

// ============================================================================
// getMasterList / search
// ============================================================================

/// Key under which the master list carries session metadata next to bills.
pub const MASTER_LIST_SESSION_KEY: &str = "session";

/// Key under which search results carry the paging summary.
pub const SEARCH_SUMMARY_KEY: &str = "summary";

/// Split a keyed mapping into its non-metadata values, in upstream order.
pub fn keyed_values(map: Map<String, Value>, skip: &str) -> Vec<Value> {
  map
    .into_iter()
    .filter(|(k, _)| k != skip)
    .map(|(_, v)| v)
    .collect()
}
