//! Data sources: where a report's master data, fights and events come from.
//!
//! The core never talks to the log host itself. A [`DataSource`] hands it
//! fully assembled, time-ordered event lists; paging is hidden behind
//! [`collect_pages`].

mod error;
mod memory;
mod paging;

pub use error::SourceError;
pub use memory::{MemorySource, ReportDump, ReportInfo};
pub use paging::{Page, collect_pages};

use crate::auras::CombatantSnapshot;
use crate::combat_log::{Event, EventKind, FightId};
use crate::game_data::Encounter;
use crate::report::{Fight, MasterData};

/// Events a phase timeline is built from
#[derive(Debug, Clone, Default)]
pub struct CheckpointEvents {
    /// NPC deaths, time ordered
    pub deaths: Vec<Event>,
    /// Every targetability update, time ordered (both directions)
    pub targetable_transitions: Vec<Event>,
}

/// Read-only access to one report's data.
///
/// Implementations may block (network, disk); the core calls them only while
/// building a per-fight cache.
pub trait DataSource: Send + Sync {
    /// Actor and ability tables of the report
    fn master_data(&self) -> Result<MasterData, SourceError>;

    /// Every fight of the given encounter, in report order
    fn fights(&self, encounter: Encounter) -> Result<Vec<Fight>, SourceError>;

    /// One fight of the given encounter; `Ok(None)` when the report has no such fight
    fn fetch_fight(
        &self,
        encounter: Encounter,
        fight_id: FightId,
    ) -> Result<Option<Fight>, SourceError>;

    /// All events of `fight` whose kind is in `kinds`, ordered by time.
    /// An empty `kinds` slice selects every kind.
    fn fetch_typed_events(&self, fight: &Fight, kinds: &[EventKind])
    -> Result<Vec<Event>, SourceError>;

    fn fetch_checkpoint_events(
        &self,
        fight: &Fight,
        master: &MasterData,
    ) -> Result<CheckpointEvents, SourceError> {
        let deaths = self
            .fetch_typed_events(fight, &[EventKind::Death])?
            .into_iter()
            .filter(|e| master.actor(e.target).is_some_and(|a| a.is_npc()))
            .collect();
        let targetable_transitions =
            self.fetch_typed_events(fight, &[EventKind::TargetabilityUpdate])?;

        Ok(CheckpointEvents {
            deaths,
            targetable_transitions,
        })
    }

    /// Auras every combatant carried into the pull
    fn fetch_prepull_snapshot(&self, fight: &Fight) -> Result<Vec<CombatantSnapshot>, SourceError> {
        let infos = self.fetch_typed_events(fight, &[EventKind::CombatantInfo])?;
        Ok(infos.iter().map(CombatantSnapshot::from_event).collect())
    }
}
