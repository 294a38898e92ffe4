//! Serde-deserializable types matching PokéAPI responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;
use url::Url;

use super::types::{Ability, EvolutionStage, ResourceSummary, SpeciesInfo, Stat};

// ============================================================================
// Common nested field types
// ============================================================================

/// `{name, url}` reference used all over the API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiNamedResource {
  pub name: String,
  #[serde(default)]
  pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUrlRef {
  pub url: String,
}

/// Extract the trailing numeric id from an API URL.
///
/// `https://pokeapi.co/api/v2/evolution-chain/10/` yields `10`.
pub fn extract_id_from_url(url: &str) -> Option<u32> {
  let parsed = Url::parse(url).ok()?;
  parsed
    .path_segments()?
    .filter(|segment| !segment.is_empty())
    .last()?
    .parse()
    .ok()
}

// ============================================================================
// Paginated index: GET /pokemon?limit=&offset=
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPage {
  #[serde(default)]
  pub count: u64,
  pub next: Option<String>,
  pub previous: Option<String>,
  #[serde(default)]
  pub results: Vec<ApiNamedResource>,
}

// ============================================================================
// Single resource: GET /pokemon/{idOrName}
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSprites {
  pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTypeSlot {
  pub slot: u8,
  #[serde(rename = "type")]
  pub kind: ApiNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiStat {
  pub base_stat: u32,
  pub stat: ApiNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAbilitySlot {
  pub ability: ApiNamedResource,
  #[serde(default)]
  pub is_hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPokemon {
  pub id: u32,
  pub name: String,
  #[serde(default)]
  pub height: u32,
  #[serde(default)]
  pub weight: u32,
  pub base_experience: Option<u32>,
  #[serde(default)]
  pub sprites: ApiSprites,
  #[serde(default)]
  pub types: Vec<ApiTypeSlot>,
  #[serde(default)]
  pub stats: Vec<ApiStat>,
  #[serde(default)]
  pub abilities: Vec<ApiAbilitySlot>,
}

impl ApiPokemon {
  /// Convert to the lightweight card shown in lists.
  pub fn to_summary(&self) -> ResourceSummary {
    let mut slots: Vec<&ApiTypeSlot> = self.types.iter().collect();
    slots.sort_by_key(|t| t.slot);

    ResourceSummary {
      id: self.id,
      name: self.name.clone(),
      image: self.sprites.front_default.clone().unwrap_or_default(),
      types: slots.into_iter().map(|t| t.kind.name.clone()).collect(),
    }
  }

  pub fn stats(&self) -> Vec<Stat> {
    self
      .stats
      .iter()
      .map(|s| Stat {
        name: s.stat.name.clone(),
        base: s.base_stat,
      })
      .collect()
  }

  pub fn abilities(&self) -> Vec<Ability> {
    self
      .abilities
      .iter()
      .map(|a| Ability {
        name: a.ability.name.clone(),
        hidden: a.is_hidden,
      })
      .collect()
  }
}

// ============================================================================
// Species: GET /pokemon-species/{idOrName}
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenus {
  pub genus: String,
  pub language: ApiNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFlavorText {
  pub flavor_text: String,
  pub language: ApiNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSpecies {
  pub id: u32,
  pub name: String,
  #[serde(default)]
  pub genera: Vec<ApiGenus>,
  #[serde(default)]
  pub flavor_text_entries: Vec<ApiFlavorText>,
  pub generation: Option<ApiNamedResource>,
  #[serde(default)]
  pub is_legendary: bool,
  #[serde(default)]
  pub is_mythical: bool,
  pub evolution_chain: Option<ApiUrlRef>,
}

impl ApiSpecies {
  pub fn into_info(self) -> SpeciesInfo {
    let genus = self
      .genera
      .iter()
      .find(|g| g.language.name == "en")
      .map(|g| g.genus.clone());

    // Game text carries hard line breaks and form feeds
    let flavor_text = self
      .flavor_text_entries
      .iter()
      .find(|f| f.language.name == "en")
      .map(|f| {
        f.flavor_text
          .split_whitespace()
          .collect::<Vec<_>>()
          .join(" ")
      });

    SpeciesInfo {
      genus,
      flavor_text,
      generation: self.generation.map(|g| g.name),
      is_legendary: self.is_legendary,
      is_mythical: self.is_mythical,
      evolution_chain_url: self.evolution_chain.map(|c| c.url),
    }
  }
}

// ============================================================================
// Evolution chain: GET /evolution-chain/{id}
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEvolutionDetail {
  pub min_level: Option<u32>,
  pub trigger: Option<ApiNamedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiChainLink {
  pub species: ApiNamedResource,
  #[serde(default)]
  pub evolution_details: Vec<ApiEvolutionDetail>,
  #[serde(default)]
  pub evolves_to: Vec<ApiChainLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEvolutionChain {
  pub id: u32,
  pub chain: ApiChainLink,
}

impl ApiEvolutionChain {
  /// Flatten the chain tree depth-first, base form first.
  pub fn stages(&self) -> Vec<EvolutionStage> {
    let mut stages = Vec::new();
    flatten_link(&self.chain, 0, &mut stages);
    stages
  }
}

fn flatten_link(link: &ApiChainLink, depth: usize, out: &mut Vec<EvolutionStage>) {
  let detail = link.evolution_details.first();
  out.push(EvolutionStage {
    species: link.species.name.clone(),
    id: extract_id_from_url(&link.species.url),
    depth,
    min_level: detail.and_then(|d| d.min_level),
    trigger: detail.and_then(|d| d.trigger.as_ref()).map(|t| t.name.clone()),
  });
  for next in &link.evolves_to {
    flatten_link(next, depth + 1, out);
  }
}

// ============================================================================
// Type listing: GET /type/{name}
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTypeMember {
  pub pokemon: ApiNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTypeResponse {
  pub name: String,
  #[serde(default)]
  pub pokemon: Vec<ApiTypeMember>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_extract_id_from_url() {
    assert_eq!(
      extract_id_from_url("https://pokeapi.co/api/v2/evolution-chain/10/"),
      Some(10)
    );
    assert_eq!(
      extract_id_from_url("https://pokeapi.co/api/v2/pokemon-species/25"),
      Some(25)
    );
    assert_eq!(extract_id_from_url("https://pokeapi.co/api/v2/type/fire/"), None);
    assert_eq!(extract_id_from_url("not a url"), None);
  }

  #[test]
  fn test_summary_orders_types_by_slot() {
    let pokemon: ApiPokemon = serde_json::from_value(json!({
      "id": 1,
      "name": "bulbasaur",
      "sprites": {"front_default": "https://img/1.png"},
      "types": [
        {"slot": 2, "type": {"name": "poison", "url": ""}},
        {"slot": 1, "type": {"name": "grass", "url": ""}}
      ]
    }))
    .unwrap();

    let summary = pokemon.to_summary();
    assert_eq!(summary.types, vec!["grass", "poison"]);
    assert_eq!(summary.image, "https://img/1.png");
  }

  #[test]
  fn test_missing_sprite_is_empty_image() {
    let pokemon: ApiPokemon =
      serde_json::from_value(json!({"id": 10001, "name": "deoxys-attack"})).unwrap();
    assert_eq!(pokemon.to_summary().image, "");
  }

  #[test]
  fn test_species_info_normalizes_flavor_text() {
    let species: ApiSpecies = serde_json::from_value(json!({
      "id": 25,
      "name": "pikachu",
      "genera": [
        {"genus": "Ratón", "language": {"name": "es"}},
        {"genus": "Mouse Pokémon", "language": {"name": "en"}}
      ],
      "flavor_text_entries": [
        {"flavor_text": "When several of\nthese POKéMON\u{c}gather", "language": {"name": "en"}}
      ],
      "generation": {"name": "generation-i", "url": ""},
      "evolution_chain": {"url": "https://pokeapi.co/api/v2/evolution-chain/10/"}
    }))
    .unwrap();

    let info = species.into_info();
    assert_eq!(info.genus.as_deref(), Some("Mouse Pokémon"));
    assert_eq!(
      info.flavor_text.as_deref(),
      Some("When several of these POKéMON gather")
    );
    assert_eq!(info.generation.as_deref(), Some("generation-i"));
    assert!(info.evolution_chain_url.is_some());
  }

  #[test]
  fn test_evolution_chain_flattens_depth_first() {
    let chain: ApiEvolutionChain = serde_json::from_value(json!({
      "id": 10,
      "chain": {
        "species": {"name": "pichu", "url": "https://pokeapi.co/api/v2/pokemon-species/172/"},
        "evolution_details": [],
        "evolves_to": [{
          "species": {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/"},
          "evolution_details": [{"min_level": null, "trigger": {"name": "level-up", "url": ""}}],
          "evolves_to": [{
            "species": {"name": "raichu", "url": "https://pokeapi.co/api/v2/pokemon-species/26/"},
            "evolution_details": [{"min_level": null, "trigger": {"name": "use-item", "url": ""}}],
            "evolves_to": []
          }]
        }]
      }
    }))
    .unwrap();

    let stages = chain.stages();
    let names: Vec<_> = stages.iter().map(|s| s.species.as_str()).collect();
    assert_eq!(names, vec!["pichu", "pikachu", "raichu"]);
    assert_eq!(stages[2].depth, 2);
    assert_eq!(stages[1].id, Some(25));
    assert_eq!(stages[2].trigger.as_deref(), Some("use-item"));
  }
}
