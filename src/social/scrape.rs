//! Social media handle extraction from candidate biography pages.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::types::{Platform, SocialMediaRecord};

static ANCHOR_SELECTOR: LazyLock<Selector> =
  LazyLock::new(|| Selector::parse("a[href]").expect("Failed to parse anchor selector"));

// Username rules per platform. The whole path segment has to match.
static TWITTER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^@?([a-zA-Z0-9_]+)$").expect("Failed to compile Twitter regex"));
static INSTAGRAM_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^@?([a-zA-Z0-9._]+)$").expect("Failed to compile Instagram regex"));
static FACEBOOK_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^@?([a-zA-Z0-9.]+)$").expect("Failed to compile Facebook regex"));

fn username_pattern(platform: Platform) -> &'static Regex {
  match platform {
    Platform::Instagram => &INSTAGRAM_RE,
    Platform::Facebook => &FACEBOOK_RE,
    Platform::Twitter => &TWITTER_RE,
  }
}

/// Normalize a profile link to an `@handle`.
///
/// Takes the last path segment of the link, drops surrounding `@`, and
/// validates it against the platform's username rules.
pub fn handle_from_href(href: &str, platform: Platform) -> Option<String> {
  let segment = href.trim_matches('/').rsplit('/').next()?;
  let segment = segment.trim_matches('@');

  username_pattern(platform)
    .captures(segment)
    .and_then(|caps| caps.get(1))
    .map(|m| format!("@{}", m.as_str()))
}

/// First link on the page pointing at `platform`.
fn find_profile_link<'a>(document: &'a Html, platform: Platform) -> Option<&'a str> {
  document
    .select(&ANCHOR_SELECTOR)
    .filter_map(|a| a.value().attr("href"))
    .find(|href| href.contains(platform.domain()))
}

/// Extract every known handle from a biography page.
///
/// Platforms without a link, or whose link doesn't yield a valid username,
/// are left unset on the returned record.
pub fn extract_social_handles(html: &str, name: &str) -> SocialMediaRecord {
  let document = Html::parse_document(html);
  let mut record = SocialMediaRecord::unresolved(name);

  for platform in Platform::ALL {
    let handle =
      find_profile_link(&document, platform).and_then(|href| handle_from_href(href, platform));
    record.set_handle(platform, handle);
  }

  record
}
