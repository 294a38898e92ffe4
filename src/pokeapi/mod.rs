//! PokéAPI access: transport, cached client, and detail aggregation.

pub mod api_types;
pub mod client;
pub mod details;
pub mod error;
pub mod fetcher;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use client::ResourceClient;
pub use details::DetailResolver;
pub use error::{ResourceError, ResourceResult};
pub use types::{DetailPart, ResourceDetail, ResourceSummary};
