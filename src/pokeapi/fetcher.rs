//! Transport seam between the resource client and the network.

use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::error::{ResourceError, ResourceResult};

/// Something that can turn a request path into a JSON document.
///
/// Paths are relative to the API base URL and always start with `/`
/// (e.g. `/pokemon/25` or `/pokemon?limit=20&offset=0`).
pub trait Fetcher: Send + Sync {
  fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, ResourceResult<Value>>;
}

/// HTTP fetcher backed by reqwest.
#[derive(Clone)]
pub struct HttpFetcher {
  http: reqwest::Client,
  base_url: String,
}

impl HttpFetcher {
  pub fn new(base_url: &Url, timeout: Duration) -> color_eyre::Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!("dexterm/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| color_eyre::eyre::eyre!("Failed to build HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url: base_url.as_str().trim_end_matches('/').to_string(),
    })
  }

  fn endpoint(&self, path: &str) -> ResourceResult<Url> {
    let full = format!("{}{}", self.base_url, path);
    Url::parse(&full).map_err(|e| ResourceError::network(path, e))
  }

  async fn get_json(&self, path: &str) -> ResourceResult<Value> {
    let url = self.endpoint(path)?;
    tracing::debug!(%url, "GET");

    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| ResourceError::network(path, e))?;

    if let Some(err) = classify_status(path, response.status()) {
      return Err(err);
    }

    response
      .json::<Value>()
      .await
      .map_err(|e| ResourceError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
      })
  }
}

impl Fetcher for HttpFetcher {
  fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, ResourceResult<Value>> {
    Box::pin(self.get_json(path))
  }
}

/// Map an HTTP status onto the error taxonomy. `None` means success.
fn classify_status(path: &str, status: StatusCode) -> Option<ResourceError> {
  if status.is_success() {
    None
  } else if status == StatusCode::NOT_FOUND {
    Some(ResourceError::not_found(path))
  } else {
    Some(ResourceError::network(path, format!("HTTP status {}", status)))
  }
}
