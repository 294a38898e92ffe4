//! Stateful controllers exposing read-only projections to the UI.
//!
//! Each controller owns a `watch` channel holding an immutable state
//! snapshot. State only changes through the transition functions on the
//! state types, committed by the controller once an operation completes.

pub mod detail;
pub mod pager;
pub mod search;

pub use detail::{DetailController, DetailState};
pub use pager::{ListPager, PagerState};
pub use search::{SearchController, SearchOptions, SearchState};
