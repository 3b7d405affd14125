//! Social media handles for legislators, scraped from Vote Smart biographies.
//!
//! Lookups go through a store so each person is only scraped once:
//! - `store` holds resolved records (JSON file or in-memory)
//! - `scrape` pulls profile links out of a biography page
//! - `resolver` ties sponsor lookup, scraping and the store together

mod resolver;
mod scrape;
mod store;
mod types;

pub use resolver::{biography_url, SocialMediaResolver, DEFAULT_BIOGRAPHY_URL};
pub use scrape::{extract_social_handles, handle_from_href};
pub use store::{JsonFileStore, MemoryStore, SocialMediaStore};
pub use types::{Platform, SocialMediaRecord};
