//! Error taxonomy for upstream resource lookups.

use std::time::Duration;
use thiserror::Error;

/// Errors produced while resolving a resource from the upstream API.
///
/// Controllers branch on the variant: `NotFound` drives the search fallback,
/// `Aborted` is swallowed, everything else is shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceError {
  /// Transport failure, timeout, or a non-2xx status other than 404
  #[error("Network error fetching {path}: {reason}")]
  Network { path: String, reason: String },

  /// The upstream answered 404 for this path
  #[error("Not found: {path}")]
  NotFound { path: String },

  /// The operation was superseded or cancelled
  #[error("Request was cancelled")]
  Aborted,

  /// The response body did not match the expected shape
  #[error("Failed to decode {path}: {reason}")]
  Decode { path: String, reason: String },
}

impl ResourceError {
  pub fn network(path: &str, reason: impl ToString) -> Self {
    Self::Network {
      path: path.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn not_found(path: &str) -> Self {
    Self::NotFound {
      path: path.to_string(),
    }
  }

  pub fn timeout(path: &str, after: Duration) -> Self {
    Self::network(path, format!("timed out after {}ms", after.as_millis()))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }

  pub fn is_aborted(&self) -> bool {
    matches!(self, Self::Aborted)
  }
}

pub type ResourceResult<T> = std::result::Result<T, ResourceError>;
