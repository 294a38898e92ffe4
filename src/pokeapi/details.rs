//! Aggregates a pokemon, its species and its evolution chain.

use std::sync::Arc;

use super::api_types::extract_id_from_url;
use super::client::ResourceClient;
use super::error::{ResourceError, ResourceResult};
use super::types::{DetailPart, EvolutionStage, ResourceDetail, SpeciesInfo};

/// Builds [`ResourceDetail`] aggregates from several dependent lookups.
///
/// The base pokemon must resolve or the whole call fails. Species and
/// evolution chain are best-effort: a failure there is logged, the part is
/// left empty and recorded in `missing`. Cancellation always propagates.
#[derive(Clone)]
pub struct DetailResolver {
  client: Arc<ResourceClient>,
}

impl DetailResolver {
  pub fn new(client: Arc<ResourceClient>) -> Self {
    Self { client }
  }

  pub async fn get_details(&self, id_or_name: &str) -> ResourceResult<ResourceDetail> {
    let id_or_name = id_or_name.trim().to_lowercase();
    let pokemon = self.client.get_pokemon(&id_or_name).await?;
    let mut missing = Vec::new();

    let species = match self.species(pokemon.id).await {
      Ok(species) => Some(species),
      Err(ResourceError::Aborted) => return Err(ResourceError::Aborted),
      Err(e) => {
        tracing::warn!(pokemon = %pokemon.name, error = %e, "species lookup failed");
        missing.push(DetailPart::Species);
        None
      }
    };

    let chain_url = species
      .as_ref()
      .and_then(|s| s.evolution_chain_url.as_deref());
    let evolution = match chain_url {
      Some(url) => match self.evolution(url).await {
        Ok(stages) => Some(stages),
        Err(ResourceError::Aborted) => return Err(ResourceError::Aborted),
        Err(e) => {
          tracing::warn!(pokemon = %pokemon.name, error = %e, "evolution chain lookup failed");
          missing.push(DetailPart::EvolutionChain);
          None
        }
      },
      None => None,
    };

    Ok(ResourceDetail {
      summary: pokemon.to_summary(),
      height: pokemon.height,
      weight: pokemon.weight,
      base_experience: pokemon.base_experience,
      stats: pokemon.stats(),
      abilities: pokemon.abilities(),
      species,
      evolution,
      missing,
    })
  }

  async fn species(&self, id: u32) -> ResourceResult<SpeciesInfo> {
    Ok(self.client.get_species(&id.to_string()).await?.into_info())
  }

  async fn evolution(&self, chain_url: &str) -> ResourceResult<Vec<EvolutionStage>> {
    let id = extract_id_from_url(chain_url).ok_or_else(|| ResourceError::Decode {
      path: chain_url.to_string(),
      reason: "evolution chain URL has no numeric id".to_string(),
    })?;
    Ok(self.client.get_evolution_chain(id).await?.stages())
  }
}
