//! HTTP transport used by the client.
//!
//! Every request is a single GET with no retry. The trait exists so the
//! gateway and the social media resolver can be exercised without a network.

use async_trait::async_trait;

use super::error::{LegiScanError, Result};

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: u16,
  pub body: String,
}

impl HttpResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

#[async_trait]
pub trait Transport: Send + Sync {
  /// Issue a GET request and read the whole body.
  async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
  client: reqwest::Client,
}

impl ReqwestTransport {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl Transport for ReqwestTransport {
  async fn get(&self, url: &str) -> Result<HttpResponse> {
    let transport_err = |e: reqwest::Error| LegiScanError::Transport {
      url: url.to_string(),
      message: e.to_string(),
    };

    let response = self.client.get(url).send().await.map_err(transport_err)?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(transport_err)?;

    Ok(HttpResponse { status, body })
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use super::*;
  use std::collections::HashMap;
  use std::sync::{Arc, Mutex};

  /// In-memory transport that serves canned responses and records requests.
  #[derive(Clone, Default)]
  pub struct FakeTransport {
    routes: Arc<Mutex<Vec<(String, HttpResponse)>>>,
    requests: Arc<Mutex<Vec<String>>>,
  }

  impl FakeTransport {
    pub fn new() -> Self {
      Self::default()
    }

    /// Serve `body` with `status` for any URL containing `fragment`.
    /// Routes are matched in the order they were added.
    pub fn route(&self, fragment: &str, status: u16, body: impl Into<String>) -> &Self {
      self.routes.lock().unwrap().push((
        fragment.to_string(),
        HttpResponse {
          status,
          body: body.into(),
        },
      ));
      self
    }

    pub fn requests(&self) -> Vec<String> {
      self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
      self.requests.lock().unwrap().len()
    }

    /// Query parameters of the n-th request.
    pub fn query_of(&self, n: usize) -> HashMap<String, String> {
      let url = url::Url::parse(&self.requests()[n]).unwrap();
      url.query_pairs().into_owned().collect()
    }
  }

  #[async_trait]
  impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
      self.requests.lock().unwrap().push(url.to_string());
      self
        .routes
        .lock()
        .unwrap()
        .iter()
        .find(|(fragment, _)| url.contains(fragment.as_str()))
        .map(|(_, response)| response.clone())
        .ok_or_else(|| LegiScanError::Transport {
          url: url.to_string(),
          message: "connection refused".to_string(),
        })
    }
  }
}
