//! LegiScan API client.

pub mod api_types;
pub mod client;
pub mod error;
pub mod gov_link;
pub mod transport;
pub mod types;

pub use client::{LegiScanClient, Params};
pub use error::{LegiScanError, Result};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
