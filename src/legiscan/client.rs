use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Config;
use crate::filter::MasterListFilter;

use super::api_types::{
  keyed_values, take_field, ApiSponsor, ApiStatus, MASTER_LIST_SESSION_KEY, SEARCH_SUMMARY_KEY,
};
use super::error::{LegiScanError, Result};
use super::transport::{ReqwestTransport, Transport};
use super::types::{
  Amendment, Bill, BillStub, BillText, RollCall, SearchResults, SearchYear, Session, Supplement,
};

pub const DEFAULT_API_URL: &str = "https://api.legiscan.com/";
pub const DEFAULT_STATE: &str = "ca";

/// Query parameters for one API operation.
#[derive(Debug, Clone, Default)]
pub enum Params {
  #[default]
  None,
  /// Already url-encoded, appended verbatim
  Encoded(String),
  /// Field/value pairs, url-encoded when the URL is built
  Fields(Vec<(&'static str, String)>),
}

/// LegiScan API client.
///
/// State codes are USPS abbreviations; bill numbers are case insensitive.
/// Every method issues exactly one request and makes no attempt to retry.
#[derive(Clone)]
pub struct LegiScanClient {
  base_url: String,
  api_key: String,
  state: Option<String>,
  transport: Arc<dyn Transport>,
}

impl LegiScanClient {
  pub fn new(api_key: &str) -> Self {
    Self {
      base_url: DEFAULT_API_URL.to_string(),
      api_key: api_key.trim().to_string(),
      state: Some(DEFAULT_STATE.to_string()),
      transport: Arc::new(ReqwestTransport::new()),
    }
  }

  pub fn from_config(config: &Config, api_key: &str) -> Self {
    Self::new(api_key)
      .with_base_url(&config.api_url)
      .with_state(Some(config.default_state.clone()))
  }

  pub fn with_base_url(mut self, base_url: &str) -> Self {
    self.base_url = base_url.to_string();
    self
  }

  pub fn with_state(mut self, state: Option<String>) -> Self {
    self.state = state;
    self
  }

  pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
    self.transport = transport;
    self
  }

  /// State scoping list, search and bill-number lookups.
  pub fn state(&self) -> Option<&str> {
    self.state.as_deref()
  }

  pub fn set_state(&mut self, state: Option<String>) {
    self.state = state;
  }

  pub(crate) fn transport(&self) -> &dyn Transport {
    self.transport.as_ref()
  }

  fn require_state(&self, usage: &'static str) -> Result<&str> {
    self.state().ok_or(LegiScanError::Usage(usage))
  }

  /// Build a URL for querying the API.
  pub fn build_url(&self, operation: &str, params: &Params) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query
      .append_pair("key", &self.api_key)
      .append_pair("op", operation);

    if let Params::Fields(fields) = params {
      for (name, value) in fields {
        query.append_pair(name, value);
      }
    }

    let mut query = query.finish();
    if let Params::Encoded(encoded) = params {
      let encoded = encoded.trim_start_matches('&');
      if !encoded.is_empty() {
        query.push('&');
        query.push_str(encoded);
      }
    }

    format!("{}?{}", self.base_url, query)
  }

  /// Get and parse the JSON envelope for a URL.
  ///
  /// Fails on a non-success HTTP status before looking at the body, and on an
  /// envelope whose `status` is `"ERROR"`.
  pub async fn fetch(&self, url: &str) -> Result<Value> {
    let response = self.transport.get(url).await?;
    if !response.is_success() {
      return Err(LegiScanError::HttpStatus {
        status: response.status,
        url: url.to_string(),
      });
    }

    let data: Value = serde_json::from_str(&response.body)?;
    let status = ApiStatus::deserialize(&data)?;
    if status.is_error() {
      return Err(LegiScanError::Api {
        message: status.message(),
      });
    }

    Ok(data)
  }

  async fn call(&self, operation: &str, params: Params) -> Result<Value> {
    debug!(operation, "LegiScan request");
    let url = self.build_url(operation, &params);
    self.fetch(&url).await
  }

  /// List of available sessions for the current state.
  pub async fn session_list(&self) -> Result<Vec<Session>> {
    let state = self.require_state("Must specify state.")?;
    let mut data = self
      .call("getSessionList", Params::Fields(vec![("state", state.to_string())]))
      .await?;
    take_field(&mut data, "sessions")
  }

  /// Bills for the current session of the current state, or for the given
  /// session when no state is selected.
  pub async fn master_list(&self, session_id: Option<u64>) -> Result<Vec<BillStub>> {
    let params = match (self.state(), session_id) {
      (Some(state), _) => Params::Fields(vec![("state", state.to_string())]),
      (None, Some(id)) => Params::Fields(vec![("id", id.to_string())]),
      (None, None) => {
        return Err(LegiScanError::Usage(
          "Must specify session identifier or state.",
        ))
      }
    };

    let mut data = self.call("getMasterList", params).await?;
    let masterlist: Map<String, Value> = take_field(&mut data, "masterlist")?;

    keyed_values(masterlist, MASTER_LIST_SESSION_KEY)
      .into_iter()
      .map(|stub| serde_json::from_value(stub).map_err(LegiScanError::from))
      .collect()
  }

  /// Primary bill detail: sponsors, committee references, history, texts and
  /// roll calls.
  ///
  /// The bill id is preferred and is required for bills from prior sessions.
  /// A bill number is resolved against the current state.
  pub async fn bill(&self, bill_id: Option<u64>, bill_number: Option<&str>) -> Result<Bill> {
    let params = match (bill_id, self.state(), bill_number) {
      (Some(id), _, _) => Params::Fields(vec![("id", id.to_string())]),
      (None, Some(state), Some(number)) => Params::Fields(vec![
        ("state", state.to_string()),
        ("bill", number.to_string()),
      ]),
      _ => {
        return Err(LegiScanError::Usage(
          "Must specify bill_id or state and bill_number.",
        ))
      }
    };

    let mut data = self.call("getBill", params).await?;
    take_field(&mut data, "bill")
  }

  /// Bill text with date, draft revision and MIME type. The document itself is
  /// base64 encoded.
  pub async fn bill_text(&self, doc_id: u64) -> Result<BillText> {
    let mut data = self.call("getBillText", id_param(doc_id)).await?;
    take_field(&mut data, "text")
  }

  pub async fn amendment(&self, amendment_id: u64) -> Result<Amendment> {
    let mut data = self.call("getAmendment", id_param(amendment_id)).await?;
    take_field(&mut data, "amendment")
  }

  pub async fn supplement(&self, supplement_id: u64) -> Result<Supplement> {
    let mut data = self.call("getSupplement", id_param(supplement_id)).await?;
    take_field(&mut data, "supplement")
  }

  /// Roll call detail for individual votes plus summary counts.
  pub async fn roll_call(&self, roll_call_id: u64) -> Result<RollCall> {
    let mut data = self.call("getRollcall", id_param(roll_call_id)).await?;
    take_field(&mut data, "roll_call")
  }

  /// Sponsor information including name, role and external identifiers.
  pub async fn sponsor(&self, people_id: u64) -> Result<ApiSponsor> {
    let mut data = self.call("getSponsor", id_param(people_id)).await?;
    take_field(&mut data, "person")
  }

  /// One page of results from the full text search engine.
  ///
  /// A bill number takes priority over a query string.
  pub async fn search(
    &self,
    bill_number: Option<&str>,
    query: Option<&str>,
    year: SearchYear,
    page: u32,
  ) -> Result<SearchResults> {
    let mut fields = Vec::new();
    if let Some(state) = self.state() {
      fields.push(("state", state.to_string()));
    }
    match (bill_number, query) {
      (Some(number), _) => fields.push(("bill", number.to_string())),
      (None, Some(query)) => {
        fields.push(("query", query.to_string()));
        fields.push(("year", year.as_param()));
        fields.push(("page", page.to_string()));
      }
      (None, None) => return Err(LegiScanError::Usage("Must specify bill_number or query")),
    }

    let mut data = self.call("search", Params::Fields(fields)).await?;
    let mut results: Map<String, Value> = take_field(&mut data, "searchresult")?;
    let summary = results
      .shift_remove(SEARCH_SUMMARY_KEY)
      .ok_or(LegiScanError::MissingField(SEARCH_SUMMARY_KEY))?;

    Ok(SearchResults {
      summary,
      results: keyed_values(results, SEARCH_SUMMARY_KEY),
    })
  }

  /// Bills added since a previous master list fetch.
  ///
  /// The master list is trimmed by the number of bills seen last time, then
  /// filtered. Stubs without a `bill_id` are never returned.
  pub async fn new_bill_stubs(
    &self,
    num_old_bills: usize,
    filter: &MasterListFilter,
  ) -> Result<Vec<BillStub>> {
    let master = self.master_list(None).await?;
    let keep = master.len().saturating_sub(num_old_bills);
    let filter = filter.clone().present("bill_id");
    Ok(filter.apply(&master[..keep]))
  }
}

fn id_param(id: u64) -> Params {
  Params::Fields(vec![("id", id.to_string())])
}

impl fmt::Debug for LegiScanClient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LegiScanClient")
      .field("base_url", &self.base_url)
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::legiscan::transport::testing::FakeTransport;
  use serde_json::json;

  fn client_with(transport: &FakeTransport) -> LegiScanClient {
    LegiScanClient::new("secret-key").with_transport(Arc::new(transport.clone()))
  }

  fn ok(payload: Value) -> String {
    let mut envelope = json!({"status": "OK"});
    envelope
      .as_object_mut()
      .unwrap()
      .extend(payload.as_object().unwrap().clone());
    envelope.to_string()
  }

  #[test]
  fn test_build_url_encodes_fields_once() {
    let client = LegiScanClient::new("  abc123 \n");
    let url = client.build_url(
      "search",
      &Params::Fields(vec![("query", "tax & fees".to_string()), ("state", "ca".to_string())]),
    );
    assert_eq!(
      url,
      "https://api.legiscan.com/?key=abc123&op=search&query=tax+%26+fees&state=ca"
    );
  }

  #[test]
  fn test_build_url_encoded_and_empty_params() {
    let client = LegiScanClient::new("k");
    assert_eq!(
      client.build_url("getBill", &Params::Encoded("id=42".to_string())),
      "https://api.legiscan.com/?key=k&op=getBill&id=42"
    );
    assert_eq!(
      client.build_url("getSessionList", &Params::None),
      "https://api.legiscan.com/?key=k&op=getSessionList"
    );
  }

  #[tokio::test]
  async fn test_fetch_http_error_skips_parse() {
    let transport = FakeTransport::new();
    transport.route("getBill", 503, "<html>not json</html>");
    let client = client_with(&transport);

    let err = client.bill(Some(1), None).await.unwrap_err();
    match err {
      LegiScanError::HttpStatus { status, url } => {
        assert_eq!(status, 503);
        assert!(url.contains("op=getBill"));
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_fetch_api_error_carries_message() {
    let transport = FakeTransport::new();
    transport.route(
      "getBill",
      200,
      json!({"status": "ERROR", "alert": {"message": "Invalid API key"}}).to_string(),
    );
    let client = client_with(&transport);

    let err = client.bill(Some(1), None).await.unwrap_err();
    assert!(err.is_gateway());
    assert_eq!(err.to_string(), "Invalid API key");
  }

  #[tokio::test]
  async fn test_fetch_malformed_json() {
    let transport = FakeTransport::new();
    transport.route("getBill", 200, "{not json");
    let client = client_with(&transport);

    let err = client.bill(Some(1), None).await.unwrap_err();
    assert!(matches!(err, LegiScanError::Json(_)));
  }

  #[tokio::test]
  async fn test_missing_payload_key() {
    let transport = FakeTransport::new();
    transport.route("getRollcall", 200, json!({"status": "OK"}).to_string());
    let client = client_with(&transport);

    let err = client.roll_call(7).await.unwrap_err();
    assert!(matches!(err, LegiScanError::MissingField("roll_call")));
  }

  #[tokio::test]
  async fn test_session_list_requires_state() {
    let transport = FakeTransport::new();
    let client = client_with(&transport).with_state(None);

    let err = client.session_list().await.unwrap_err();
    assert!(matches!(err, LegiScanError::Usage(_)));
    assert_eq!(transport.request_count(), 0);
  }

  #[tokio::test]
  async fn test_master_list_usage_and_priority() {
    let transport = FakeTransport::new();
    transport.route(
      "getMasterList",
      200,
      ok(json!({"masterlist": {
        "session": {"session_id": 1789},
        "0": {"bill_id": 10, "number": "AB1"},
        "1": {"bill_id": 11, "number": "AB2"}
      }})),
    );

    let mut client = client_with(&transport).with_state(None);
    let err = client.master_list(None).await.unwrap_err();
    assert!(matches!(err, LegiScanError::Usage(_)));
    assert_eq!(transport.request_count(), 0);

    let stubs = client.master_list(Some(1789)).await.unwrap();
    assert_eq!(stubs.len(), 2);
    assert_eq!(stubs[0]["number"], "AB1");
    assert_eq!(transport.query_of(0).get("id").map(String::as_str), Some("1789"));

    client.set_state(Some("tx".to_string()));
    client.master_list(Some(1789)).await.unwrap();
    let query = transport.query_of(1);
    assert_eq!(query.get("state").map(String::as_str), Some("tx"));
    assert!(!query.contains_key("id"));
  }

  #[tokio::test]
  async fn test_bill_by_number_uses_state() {
    let transport = FakeTransport::new();
    transport.route("getBill", 200, ok(json!({"bill": {"bill_id": 5, "bill_number": "SB 7"}})));
    let client = client_with(&transport);

    let bill = client.bill(None, Some("SB 7")).await.unwrap();
    assert_eq!(bill["bill_id"], 5);

    let query = transport.query_of(0);
    assert_eq!(query.get("key").map(String::as_str), Some("secret-key"));
    assert_eq!(query.get("op").map(String::as_str), Some("getBill"));
    assert_eq!(query.get("state").map(String::as_str), Some("ca"));
    assert_eq!(query.get("bill").map(String::as_str), Some("SB 7"));

    let err = client.bill(None, None).await.unwrap_err();
    assert!(matches!(err, LegiScanError::Usage(_)));
  }

  #[tokio::test]
  async fn test_single_id_endpoints_unwrap() {
    let transport = FakeTransport::new();
    transport
      .route("getBillText", 200, ok(json!({"text": {"doc_id": 1}})))
      .route("getAmendment", 200, ok(json!({"amendment": {"amendment_id": 2}})))
      .route("getSupplement", 200, ok(json!({"supplement": {"supplement_id": 3}})))
      .route("getRollcall", 200, ok(json!({"roll_call": {"roll_call_id": 4}})))
      .route("getSponsor", 200, ok(json!({"person": {"people_id": 5, "name": "Jane Doe"}})));
    let client = client_with(&transport);

    assert_eq!(client.bill_text(1).await.unwrap()["doc_id"], 1);
    assert_eq!(client.amendment(2).await.unwrap()["amendment_id"], 2);
    assert_eq!(client.supplement(3).await.unwrap()["supplement_id"], 3);
    assert_eq!(client.roll_call(4).await.unwrap()["roll_call_id"], 4);
    assert_eq!(client.sponsor(5).await.unwrap().name, "Jane Doe");
    assert_eq!(transport.request_count(), 5);
  }

  #[tokio::test]
  async fn test_search_query_splits_summary() {
    let transport = FakeTransport::new();
    transport.route(
      "op=search",
      200,
      ok(json!({"searchresult": {
        "summary": {"page": "1 of 1", "count": 2},
        "0": {"bill_number": "AB 10", "relevance": 90},
        "1": {"bill_number": "SB 3", "relevance": 40}
      }})),
    );
    let client = client_with(&transport);

    let results = client
      .search(None, Some("cannabis"), SearchYear::Recent, 2)
      .await
      .unwrap();
    assert_eq!(results.summary["count"], 2);
    assert_eq!(results.results.len(), 2);
    assert_eq!(results.results[1]["bill_number"], "SB 3");

    let query = transport.query_of(0);
    assert_eq!(query.get("query").map(String::as_str), Some("cannabis"));
    assert_eq!(query.get("year").map(String::as_str), Some("3"));
    assert_eq!(query.get("page").map(String::as_str), Some("2"));

    let err = client
      .search(None, None, SearchYear::default(), 1)
      .await
      .unwrap_err();
    assert!(matches!(err, LegiScanError::Usage(_)));
  }

  #[tokio::test]
  async fn test_new_bill_stubs_trims_and_filters() {
    let transport = FakeTransport::new();
    transport.route(
      "getMasterList",
      200,
      ok(json!({"masterlist": {
        "session": {"session_id": 1},
        "0": {"bill_id": 1, "status": 1},
        "1": {"bill_id": 2, "status": 2},
        "2": {"bill_id": 3, "status": 1},
        "3": {"number": "orphan", "status": 1}
      }})),
    );
    let client = client_with(&transport);

    let filter = MasterListFilter::new().equals("status", json!(1));
    let stubs = client.new_bill_stubs(1, &filter).await.unwrap();
    let ids: Vec<_> = stubs.iter().map(|s| s["bill_id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(3)]);

    let all = client.new_bill_stubs(10, &MasterListFilter::new()).await.unwrap();
    assert!(all.is_empty());
  }
}
