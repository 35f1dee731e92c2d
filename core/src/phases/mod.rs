//! Phase timelines: which phase of an encounter a timestamp falls in.
//!
//! A [`Timeline`] is built once per fight from boss deaths and targetability
//! updates by the encounter's [`PhaseModel`]. Lookups scan the checkpoints
//! backwards from the query time.

mod dsu;
mod error;
mod model;
mod timeline;


pub use dsu::BEFORE_RECORDED_HISTORY;
pub use error::PhaseError;
pub use model::PhaseModel;
pub use timeline::Timeline;
