//! Resolves a legislator's social media handles from their Vote Smart
//! biography, with a read-through cache in front.

use tracing::{info, warn};

use crate::legiscan::client::LegiScanClient;
use crate::legiscan::error::Result;

use super::scrape::extract_social_handles;
use super::store::SocialMediaStore;
use super::types::SocialMediaRecord;

pub const DEFAULT_BIOGRAPHY_URL: &str = "https://votesmart.org/candidate/biography";

pub struct SocialMediaResolver<S: SocialMediaStore> {
  store: S,
  biography_url: String,
}

impl<S: SocialMediaStore> SocialMediaResolver<S> {
  pub fn new(store: S) -> Self {
    Self {
      store,
      biography_url: DEFAULT_BIOGRAPHY_URL.to_string(),
    }
  }

  pub fn with_biography_url(mut self, url: &str) -> Self {
    self.biography_url = url.trim_end_matches('/').to_string();
    self
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Find a person's Instagram, Facebook and Twitter handles.
  ///
  /// 1. Cached records are returned as-is, with no network activity
  /// 2. Otherwise the sponsor is looked up for a name and Vote Smart id
  /// 3. The biography page is scraped for profile links, if there is one
  /// 4. The result is cached and the whole store saved
  ///
  /// A missing Vote Smart id or an unreachable biography page is not an
  /// error: the record just has no handles. Cached entries are never refreshed.
  pub async fn find_social_media(
    &mut self,
    client: &LegiScanClient,
    person_id: u64,
  ) -> Result<SocialMediaRecord> {
    let key = person_id.to_string();
    if let Some(record) = self.store.get(&key) {
      return Ok(record.clone());
    }

    let sponsor = client.sponsor(person_id).await?;
    info!(name = %sponsor.name, person_id, "Finding social media");

    let record = match sponsor.votesmart_id() {
      None => {
        info!(name = %sponsor.name, person_id, "No Vote Smart id for person");
        SocialMediaRecord::unresolved(&sponsor.name)
      }
      Some(votesmart_id) => {
        let url = biography_url(&self.biography_url, &votesmart_id, &sponsor.name);
        match fetch_page(client, &url).await {
          Some(html) => extract_social_handles(&html, &sponsor.name),
          None => SocialMediaRecord::unresolved(&sponsor.name),
        }
      }
    };

    info!(
      name = %record.name,
      person_id,
      instagram = ?record.instagram,
      facebook = ?record.facebook,
      twitter = ?record.twitter,
      "Updating social media cache"
    );
    self.store.insert(&key, record.clone());
    self.store.save()?;

    Ok(record)
  }
}

/// `<base>/<votesmart id>/<lowercased name, spaces as hyphens>`
pub fn biography_url(base: &str, votesmart_id: &str, name: &str) -> String {
  format!(
    "{}/{}/{}",
    base.trim_end_matches('/'),
    votesmart_id,
    name.to_lowercase().replace(' ', "-")
  )
}

/// Fetch a biography page. Any failure means "no page".
async fn fetch_page(client: &LegiScanClient, url: &str) -> Option<String> {
  match client.transport().get(url).await {
    Ok(response) if response.is_success() => Some(response.body),
    Ok(response) => {
      warn!(url, status = response.status, "No Vote Smart page");
      None
    }
    Err(e) => {
      warn!(url, error = %e, "No Vote Smart page");
      None
    }
  }
}
