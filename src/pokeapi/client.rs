//! Caching resource client for the PokéAPI.

use color_eyre::{eyre::eyre, Result};
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::cache::{CacheLayer, CacheStats, MemoryStorage, NoopStorage};
use crate::config::Config;

use super::api_types::{ApiEvolutionChain, ApiPage, ApiPokemon, ApiSpecies, ApiTypeResponse};
use super::error::{ResourceError, ResourceResult};
use super::fetcher::{Fetcher, HttpFetcher};
use super::types::ResourceSummary;

/// How many members of a type are resolved to cards.
const TYPE_LISTING_LIMIT: usize = 20;

/// Build `/{collection}/{name}` for a single named resource.
///
/// Upstream ids and names only use `[a-z0-9-]`. Anything else (dots,
/// slashes, `?`) would be reinterpreted as URL structure, so it is reported
/// as `NotFound` without a request.
fn resource_path(collection: &str, id_or_name: &str) -> ResourceResult<String> {
  let path = format!("/{}/{}", collection, id_or_name);
  let valid = !id_or_name.is_empty()
    && id_or_name
      .chars()
      .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
  if valid {
    Ok(path)
  } else {
    Err(ResourceError::not_found(&path))
  }
}

/// Resource client with transparent TTL caching.
///
/// Every request goes through [`ResourceClient::get`], which keys the cache by
/// the request path relative to the API base. The client is constructed once
/// by the application and shared through an `Arc`.
pub struct ResourceClient {
  fetcher: Arc<dyn Fetcher>,
  cache: CacheLayer,
  base_url: String,
  timeout: Duration,
}

impl ResourceClient {
  /// Build an HTTP-backed client from configuration.
  pub fn from_config(config: &Config) -> Result<Self> {
    let base_url = Url::parse(&config.api.base_url)
      .map_err(|e| eyre!("Invalid API base URL '{}': {}", config.api.base_url, e))?;
    let fetcher = HttpFetcher::new(&base_url, config.api.timeout())?;

    let cache = if config.cache.enabled {
      CacheLayer::new(MemoryStorage::new())
    } else {
      CacheLayer::new(NoopStorage)
    }
    .with_ttl(config.cache.ttl());

    Ok(
      Self::new(Arc::new(fetcher), base_url.as_str(), cache).with_timeout(config.api.timeout()),
    )
  }

  pub fn new(fetcher: Arc<dyn Fetcher>, base_url: &str, cache: CacheLayer) -> Self {
    Self {
      fetcher,
      cache,
      base_url: base_url.trim_end_matches('/').to_string(),
      timeout: Duration::from_secs(10),
    }
  }

  /// Upper bound for a single network call.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Normalize a request URL or path into a cache key.
  ///
  /// Strips the base URL, enforces a leading slash and drops a trailing one,
  /// so `https://…/api/v2/pokemon/1/` and `pokemon/1` share a key.
  pub fn cache_key(&self, path: &str) -> String {
    let path = path.trim();
    let relative = path.strip_prefix(&self.base_url).unwrap_or(path);
    let relative = relative.trim_start_matches('/');
    let relative = if relative.contains('?') {
      relative
    } else {
      relative.trim_end_matches('/')
    };
    format!("/{}", relative)
  }

  /// Fetch a JSON document, served from cache while within the TTL.
  pub async fn get(&self, path: &str) -> ResourceResult<Arc<Value>> {
    let key = self.cache_key(path);
    let result = self
      .cache
      .fetch(&key, || async {
        match tokio::time::timeout(self.timeout, self.fetcher.fetch(&key)).await {
          Ok(result) => result,
          Err(_) => Err(ResourceError::timeout(&key, self.timeout)),
        }
      })
      .await?;

    tracing::trace!(
      key,
      source = ?result.source,
      age_ms = result.stored_at.elapsed().as_millis() as u64,
      "resource served"
    );
    Ok(result.data)
  }

  async fn get_typed<T: DeserializeOwned>(&self, path: &str) -> ResourceResult<T> {
    let value = self.get(path).await?;
    T::deserialize(value.as_ref()).map_err(|e| ResourceError::Decode {
      path: path.to_string(),
      reason: e.to_string(),
    })
  }

  pub async fn get_pokemon(&self, id_or_name: &str) -> ResourceResult<ApiPokemon> {
    self.get_typed(&resource_path("pokemon", id_or_name)?).await
  }

  pub async fn get_species(&self, id_or_name: &str) -> ResourceResult<ApiSpecies> {
    self
      .get_typed(&resource_path("pokemon-species", id_or_name)?)
      .await
  }

  pub async fn get_evolution_chain(&self, id: u32) -> ResourceResult<ApiEvolutionChain> {
    self.get_typed(&format!("/evolution-chain/{}", id)).await
  }

  /// One page of the global pokemon index.
  pub async fn get_page(&self, limit: usize, offset: usize) -> ResourceResult<ApiPage> {
    self
      .get_typed(&format!("/pokemon?limit={}&offset={}", limit, offset))
      .await
  }

  pub async fn get_type(&self, name: &str) -> ResourceResult<ApiTypeResponse> {
    self.get_typed(&resource_path("type", name)?).await
  }

  /// Resolve a single pokemon to its card.
  pub async fn get_card(&self, id_or_name: &str) -> ResourceResult<ResourceSummary> {
    Ok(self.get_pokemon(id_or_name).await?.to_summary())
  }

  /// Resolve several pokemon to cards concurrently, preserving order.
  ///
  /// Any single failure fails the whole batch.
  pub async fn get_cards<S: AsRef<str>>(&self, names: &[S]) -> ResourceResult<Vec<ResourceSummary>> {
    try_join_all(names.iter().map(|name| self.get_card(name.as_ref()))).await
  }

  /// The first members of a type, as cards.
  pub async fn cards_by_type(&self, type_name: &str) -> ResourceResult<Vec<ResourceSummary>> {
    let type_name = type_name.trim().to_lowercase();
    let listing = self.get_type(&type_name).await?;
    let names: Vec<&str> = listing
      .pokemon
      .iter()
      .take(TYPE_LISTING_LIMIT)
      .map(|member| member.pokemon.name.as_str())
      .collect();

    tracing::info!(type_name, count = names.len(), "resolving type listing");
    self.get_cards(&names).await
  }

  /// Purge the whole cache.
  pub fn clear(&self) {
    tracing::info!("clearing response cache");
    self.cache.clear();
  }

  pub fn stats(&self) -> CacheStats {
    self.cache.stats()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pokeapi::testing::{client_for, pokemon_json, StubFetcher, BASE_URL};
  use serde_json::json;

  #[tokio::test]
  async fn test_cache_key_normalization() {
    let client = client_for(Arc::new(StubFetcher::new()));

    assert_eq!(client.cache_key("/pokemon/1"), "/pokemon/1");
    assert_eq!(client.cache_key("pokemon/1"), "/pokemon/1");
    assert_eq!(
      client.cache_key(&format!("{}/pokemon/1/", BASE_URL)),
      "/pokemon/1"
    );
    assert_eq!(
      client.cache_key("/pokemon?limit=20&offset=0"),
      "/pokemon?limit=20&offset=0"
    );
  }

  #[tokio::test(start_paused = true)]
  async fn test_get_twice_within_ttl_hits_network_once() {
    let stub = Arc::new(StubFetcher::new());
    stub.insert_json("/pokemon/1", pokemon_json(1, "bulbasaur", &["grass"]));
    let client = client_for(stub.clone());

    client.get("/pokemon/1").await.unwrap();
    tokio::time::advance(Duration::from_secs(299)).await;
    client
      .get(&format!("{}/pokemon/1", BASE_URL))
      .await
      .unwrap();

    assert_eq!(stub.call_count("/pokemon/1"), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn test_get_after_ttl_refetches_and_replaces() {
    let stub = Arc::new(StubFetcher::new());
    stub.insert_json("/pokemon/1", json!({"id": 1, "name": "bulbasaur"}));
    let client = client_for(stub.clone());

    client.get("/pokemon/1").await.unwrap();
    stub.insert_json("/pokemon/1", json!({"id": 1, "name": "bulbasaur-v2"}));
    tokio::time::advance(Duration::from_secs(300)).await;

    let value = client.get("/pokemon/1").await.unwrap();
    assert_eq!(value["name"], "bulbasaur-v2");
    assert_eq!(stub.call_count("/pokemon/1"), 2);
    assert_eq!(client.stats().keys, vec!["/pokemon/1"]);
  }

  #[tokio::test]
  async fn test_names_outside_api_charset_are_not_found_locally() {
    let stub = Arc::new(StubFetcher::new());
    let client = client_for(stub.clone());

    for name in [".", "..", "?", "a/b", "mr mime", ""] {
      let err = client.get_pokemon(name).await.unwrap_err();
      assert!(err.is_not_found(), "{:?} gave {:?}", name, err);
    }
    assert!(client.get_type("fire?x").await.unwrap_err().is_not_found());
    assert_eq!(stub.total_calls(), 0);
  }

  #[tokio::test]
  async fn test_network_error_propagates() {
    let stub = Arc::new(StubFetcher::new());
    stub.insert_error(
      "/pokemon/1",
      ResourceError::network("/pokemon/1", "HTTP status 503"),
    );
    let client = client_for(stub);

    let err = client.get_pokemon("1").await.unwrap_err();
    assert!(matches!(err, ResourceError::Network { .. }));
    assert_eq!(client.stats().size, 0);
  }

  #[tokio::test(start_paused = true)]
  async fn test_slow_response_times_out() {
    let stub = Arc::new(StubFetcher::new());
    stub.insert_delayed(
      "/pokemon/1",
      pokemon_json(1, "bulbasaur", &["grass"]),
      Duration::from_secs(30),
    );
    let client = client_for(stub).with_timeout(Duration::from_secs(5));

    let err = client.get("/pokemon/1").await.unwrap_err();
    assert!(matches!(err, ResourceError::Network { .. }));
    assert!(err.to_string().contains("timed out"));
  }

  #[tokio::test]
  async fn test_decode_error() {
    let stub = Arc::new(StubFetcher::new());
    stub.insert_json("/pokemon/1", json!({"unexpected": true}));
    let client = client_for(stub);

    let err = client.get_pokemon("1").await.unwrap_err();
    assert!(matches!(err, ResourceError::Decode { .. }));
  }

  #[tokio::test]
  async fn test_get_card() {
    let stub = Arc::new(StubFetcher::new());
    stub.insert_json("/pokemon/25", pokemon_json(25, "pikachu", &["electric"]));
    let client = client_for(stub);

    let card = client.get_card("25").await.unwrap();
    assert_eq!(card.id, 25);
    assert_eq!(card.name, "pikachu");
    assert_eq!(card.types, vec!["electric"]);
  }

  #[tokio::test]
  async fn test_cards_by_type_takes_first_twenty() {
    let stub = Arc::new(StubFetcher::new());
    let members: Vec<_> = (1..=25)
      .map(|i| json!({"pokemon": {"name": format!("mon{}", i), "url": ""}, "slot": 1}))
      .collect();
    stub.insert_json("/type/fire", json!({"name": "fire", "pokemon": members}));
    for i in 1..=25 {
      stub.insert_json(
        &format!("/pokemon/mon{}", i),
        pokemon_json(i, &format!("mon{}", i), &["fire"]),
      );
    }
    let client = client_for(stub.clone());

    let cards = client.cards_by_type(" Fire ").await.unwrap();
    assert_eq!(cards.len(), 20);
    assert_eq!(cards[0].name, "mon1");
    assert_eq!(stub.call_count("/pokemon/mon21"), 0);
  }

  #[tokio::test]
  async fn test_clear_empties_stats() {
    let stub = Arc::new(StubFetcher::new());
    stub.insert_json("/pokemon/1", pokemon_json(1, "bulbasaur", &["grass"]));
    let client = client_for(stub.clone());

    client.get("/pokemon/1").await.unwrap();
    assert_eq!(client.stats().size, 1);

    client.clear();
    assert_eq!(client.stats().size, 0);
    client.get("/pokemon/1").await.unwrap();
    assert_eq!(stub.call_count("/pokemon/1"), 2);
  }
}
