pub mod config;
pub mod filter;
pub mod legiscan;
pub mod logging;
pub mod social;

pub use filter::{Constraint, MasterListFilter, Matcher};
pub use legiscan::{LegiScanClient, LegiScanError};
pub use social::{SocialMediaRecord, SocialMediaResolver};
