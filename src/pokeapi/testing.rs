//! Test doubles shared by the client and controller tests.

use futures::future::BoxFuture;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cache::{CacheLayer, MemoryStorage};

use super::client::ResourceClient;
use super::error::{ResourceError, ResourceResult};
use super::fetcher::Fetcher;

pub const BASE_URL: &str = "https://pokeapi.test/api/v2";

#[derive(Clone)]
enum StubResponse {
  Json { body: Value, delay: Option<Duration> },
  Error { err: ResourceError, delay: Option<Duration> },
}

/// In-memory fetcher that records every request path.
///
/// Unknown paths answer `NotFound`, like the real API does.
#[derive(Default)]
pub struct StubFetcher {
  responses: Mutex<HashMap<String, StubResponse>>,
  calls: Mutex<Vec<String>>,
}

impl StubFetcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert_json(&self, path: &str, body: Value) {
    self.insert(path, StubResponse::Json { body, delay: None });
  }

  pub fn insert_delayed(&self, path: &str, body: Value, delay: Duration) {
    self.insert(
      path,
      StubResponse::Json {
        body,
        delay: Some(delay),
      },
    );
  }

  pub fn insert_error(&self, path: &str, err: ResourceError) {
    self.insert(path, StubResponse::Error { err, delay: None });
  }

  pub fn insert_delayed_error(&self, path: &str, err: ResourceError, delay: Duration) {
    self.insert(
      path,
      StubResponse::Error {
        err,
        delay: Some(delay),
      },
    );
  }

  /// Register a pokemon under both its id and its name.
  pub fn insert_pokemon(&self, id: u32, name: &str, types: &[&str]) {
    let body = pokemon_json(id, name, types);
    self.insert_json(&format!("/pokemon/{}", id), body.clone());
    self.insert_json(&format!("/pokemon/{}", name), body);
  }

  fn insert(&self, path: &str, response: StubResponse) {
    self
      .responses
      .lock()
      .unwrap()
      .insert(path.to_string(), response);
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  pub fn call_count(&self, path: &str) -> usize {
    self.calls().iter().filter(|c| c.as_str() == path).count()
  }

  pub fn total_calls(&self) -> usize {
    self.calls.lock().unwrap().len()
  }
}

impl Fetcher for StubFetcher {
  fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, ResourceResult<Value>> {
    self.calls.lock().unwrap().push(path.to_string());
    let response = self.responses.lock().unwrap().get(path).cloned();

    Box::pin(async move {
      match response {
        Some(StubResponse::Json { body, delay }) => {
          if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
          }
          Ok(body)
        }
        Some(StubResponse::Error { err, delay }) => {
          if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
          }
          Err(err)
        }
        None => Err(ResourceError::not_found(path)),
      }
    })
  }
}

/// A client over the stub with the default TTL and a generous timeout.
pub fn client_for(stub: Arc<StubFetcher>) -> ResourceClient {
  ResourceClient::new(stub, BASE_URL, CacheLayer::new(MemoryStorage::new()))
    .with_timeout(Duration::from_secs(60))
}

pub fn pokemon_json(id: u32, name: &str, types: &[&str]) -> Value {
  let types: Vec<Value> = types
    .iter()
    .enumerate()
    .map(|(i, t)| json!({"slot": i + 1, "type": {"name": t, "url": ""}}))
    .collect();

  json!({
    "id": id,
    "name": name,
    "height": 7,
    "weight": 69,
    "base_experience": 64,
    "sprites": {"front_default": format!("https://img.test/{}.png", id)},
    "types": types,
    "stats": [{"base_stat": 45, "stat": {"name": "hp", "url": ""}}],
    "abilities": [{"ability": {"name": "overgrow", "url": ""}, "is_hidden": false}]
  })
}

/// Index page in the upstream shape. `next` is set when `has_next`.
pub fn page_json(names: &[&str], offset: usize, has_next: bool) -> Value {
  let results: Vec<Value> = names
    .iter()
    .enumerate()
    .map(|(i, name)| {
      json!({
        "name": name,
        "url": format!("{}/pokemon/{}/", BASE_URL, offset + i + 1)
      })
    })
    .collect();

  json!({
    "count": 1000,
    "next": if has_next { Value::String(format!("{}/pokemon?offset={}", BASE_URL, offset + names.len())) } else { Value::Null },
    "previous": Value::Null,
    "results": results
  })
}
