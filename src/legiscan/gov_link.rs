//! Link from a LegiScan bill to its text on the California legislature site.

use chrono::Datelike;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::client::LegiScanClient;
use super::error::Result;

const LEGINFO_DOMAIN: &str = "leginfo.legislature.ca";
const LEGINFO_TEXT_URL: &str = "https://leginfo.legislature.ca.gov/faces/billTextClient.xhtml";

static STATE_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
  Selector::parse("a#statelink[href]").expect("Failed to parse state link selector")
});

/// The `statelink` anchor on a LegiScan bill page, rewritten to point at the
/// bill text instead of the bill status.
pub fn state_text_link(html: &str) -> Option<String> {
  let document = Html::parse_document(html);
  document
    .select(&STATE_LINK_SELECTOR)
    .filter_map(|a| a.value().attr("href"))
    .find(|href| href.contains(LEGINFO_DOMAIN))
    .map(|href| href.replace("billStatusClient", "billTextClient"))
}

/// Guess the leginfo text URL for a bill in the session starting `year`.
pub fn fallback_text_url(year: i32, bill_number: &str) -> String {
  format!(
    "{}?bill_id={}{}0{}",
    LEGINFO_TEXT_URL,
    year,
    year + 1,
    bill_number
  )
}

impl LegiScanClient {
  /// URL of the bill text on the state legislature site.
  ///
  /// Scrapes the LegiScan bill page for its state link; when the page can't be
  /// fetched or has no such link, the URL is built from the bill number and
  /// the current year.
  pub async fn gov_url(&self, bill_id: u64) -> Result<String> {
    let bill = self.bill(Some(bill_id), None).await?;
    let bill_number = bill
      .get("bill_number")
      .and_then(|v| v.as_str())
      .unwrap_or_default()
      .to_string();

    if let Some(page_url) = bill.get("url").and_then(|v| v.as_str()) {
      match self.transport().get(page_url).await {
        Ok(response) if response.is_success() => {
          if let Some(link) = state_text_link(&response.body) {
            return Ok(link);
          }
          debug!(page_url, "No state link on bill page");
        }
        Ok(response) => warn!(page_url, status = response.status, "Bill page unavailable"),
        Err(e) => warn!(page_url, error = %e, "Bill page unavailable"),
      }
    }

    Ok(fallback_text_url(chrono::Local::now().year(), &bill_number))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::legiscan::transport::testing::FakeTransport;
  use serde_json::json;
  use std::sync::Arc;

  #[test]
  fn test_state_text_link() {
    let html = r#"
      <a href="https://leginfo.legislature.ca.gov/faces/billStatusClient.xhtml?bill_id=1">status</a>
      <a id="statelink" href="https://leginfo.legislature.ca.gov/faces/billStatusClient.xhtml?bill_id=202320240AB5">state</a>
    "#;
    assert_eq!(
      state_text_link(html).as_deref(),
      Some("https://leginfo.legislature.ca.gov/faces/billTextClient.xhtml?bill_id=202320240AB5")
    );
    assert_eq!(state_text_link(r#"<a id="statelink" href="https://example.com">x</a>"#), None);
  }

  #[test]
  fn test_fallback_text_url() {
    assert_eq!(
      fallback_text_url(2025, "AB12"),
      "https://leginfo.legislature.ca.gov/faces/billTextClient.xhtml?bill_id=202520260AB12"
    );
  }

  #[tokio::test]
  async fn test_gov_url_scrapes_then_falls_back() {
    let transport = FakeTransport::new();
    transport
      .route(
        "getBill",
        200,
        json!({"status": "OK", "bill": {
          "bill_id": 9,
          "bill_number": "SB7",
          "url": "https://legiscan.com/CA/bill/SB7/2025"
        }})
        .to_string(),
      )
      .route(
        "legiscan.com/CA/bill/SB7",
        200,
        r#"<a id="statelink" href="https://leginfo.legislature.ca.gov/faces/billStatusClient.xhtml?bill_id=X">s</a>"#,
      );
    let client = LegiScanClient::new("k").with_transport(Arc::new(transport.clone()));

    assert_eq!(
      client.gov_url(9).await.unwrap(),
      "https://leginfo.legislature.ca.gov/faces/billTextClient.xhtml?bill_id=X"
    );

    let missing_page = FakeTransport::new();
    missing_page.route(
      "getBill",
      200,
      json!({"status": "OK", "bill": {
        "bill_id": 9,
        "bill_number": "SB7",
        "url": "https://nowhere"
      }})
      .to_string(),
    );
    let client = LegiScanClient::new("k").with_transport(Arc::new(missing_page));
    let year = chrono::Local::now().year();
    assert_eq!(client.gov_url(9).await.unwrap(), fallback_text_url(year, "SB7"));
  }
}
