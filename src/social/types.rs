use serde::{Deserialize, Serialize};

/// Resolved social media handles for one legislator.
///
/// Handles are normalized to start with `@`; an absent handle serializes as
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMediaRecord {
  #[serde(default)]
  pub instagram: Option<String>,
  #[serde(default)]
  pub facebook: Option<String>,
  #[serde(default)]
  pub twitter: Option<String>,
  pub name: String,
}

impl SocialMediaRecord {
  /// Record with a name and no handles.
  pub fn unresolved(name: &str) -> Self {
    Self {
      name: name.to_string(),
      ..Self::default()
    }
  }

  pub fn handle(&self, platform: Platform) -> Option<&str> {
    match platform {
      Platform::Instagram => self.instagram.as_deref(),
      Platform::Facebook => self.facebook.as_deref(),
      Platform::Twitter => self.twitter.as_deref(),
    }
  }

  pub fn set_handle(&mut self, platform: Platform, handle: Option<String>) {
    match platform {
      Platform::Instagram => self.instagram = handle,
      Platform::Facebook => self.facebook = handle,
      Platform::Twitter => self.twitter = handle,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
  Instagram,
  Facebook,
  Twitter,
}

impl Platform {
  pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::Facebook, Platform::Twitter];

  /// Domain that identifies a profile link for this platform.
  pub fn domain(&self) -> &'static str {
    match self {
      Self::Instagram => "instagram.com",
      Self::Facebook => "facebook.com",
      Self::Twitter => "twitter.com",
    }
  }
}
