//! Aura reconstruction: which buffs and debuffs were up on whom at a given
//! moment of a fight.
//!
//! The index for a fight is built once from the pre-pull combatant snapshot
//! and the fight's apply/remove events, then queried by backward scan.

mod index;
mod snapshot;


pub use index::AuraIndex;
pub use snapshot::{CombatantSnapshot, SnapshotAura};
