/// Card view of a pokemon for list and search results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSummary {
  pub id: u32,
  pub name: String,
  /// Sprite URL, empty when the upstream has none
  pub image: String,
  /// Type names ordered by slot
  pub types: Vec<String>,
}

/// Base stat (hp, attack, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
  pub name: String,
  pub base: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
  pub name: String,
  pub hidden: bool,
}

/// Species metadata relevant to the detail view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesInfo {
  pub genus: Option<String>,
  pub flavor_text: Option<String>,
  pub generation: Option<String>,
  pub is_legendary: bool,
  pub is_mythical: bool,
  pub evolution_chain_url: Option<String>,
}

/// One node of a flattened evolution chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionStage {
  pub species: String,
  pub id: Option<u32>,
  /// 0 for the base form
  pub depth: usize,
  pub min_level: Option<u32>,
  pub trigger: Option<String>,
}

/// Parts of a detail aggregate that may be missing after a degraded lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPart {
  Species,
  EvolutionChain,
}

impl std::fmt::Display for DetailPart {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DetailPart::Species => write!(f, "species"),
      DetailPart::EvolutionChain => write!(f, "evolution chain"),
    }
  }
}

/// Full pokemon details, aggregated from several endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDetail {
  pub summary: ResourceSummary,
  /// Decimetres
  pub height: u32,
  /// Hectograms
  pub weight: u32,
  pub base_experience: Option<u32>,
  pub stats: Vec<Stat>,
  pub abilities: Vec<Ability>,
  pub species: Option<SpeciesInfo>,
  pub evolution: Option<Vec<EvolutionStage>>,
  /// Parts that failed to load; empty for a complete aggregate
  pub missing: Vec<DetailPart>,
}

impl ResourceDetail {
  pub fn is_complete(&self) -> bool {
    self.missing.is_empty()
  }
}
