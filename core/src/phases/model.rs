use super::dsu;
use super::{PhaseError, Timeline};
use crate::combat_log::Event;
use crate::game_data::Encounter;
use crate::report::Fight;
use crate::source::CheckpointEvents;

const SINGLE_PHASE_NAMES: &[&str] = &["P1"];

/// Phase strategy of one encounter, chosen once per report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseModel {
    /// Dragonsong's Reprise checkpoint heuristics
    Dsu,
    /// Encounters without phase transitions worth tracking: one phase from pull to end
    SinglePhase(Encounter),
}

impl PhaseModel {
    pub fn for_encounter(encounter: Encounter) -> Result<Self, PhaseError> {
        match encounter {
            Encounter::Dsu => Ok(PhaseModel::Dsu),
            Encounter::P1s
            | Encounter::P2s
            | Encounter::P3s
            | Encounter::P4sPart1
            | Encounter::P4sPart2 => Ok(PhaseModel::SinglePhase(encounter)),
            Encounter::Tea | Encounter::Ucob | Encounter::Uwu => {
                Err(PhaseError::UnsupportedEncounter { encounter })
            }
        }
    }

    pub fn encounter(&self) -> Encounter {
        match self {
            PhaseModel::Dsu => Encounter::Dsu,
            PhaseModel::SinglePhase(encounter) => *encounter,
        }
    }

    pub fn phase_names(&self) -> &'static [&'static str] {
        match self {
            PhaseModel::Dsu => dsu::PHASE_NAMES,
            PhaseModel::SinglePhase(_) => SINGLE_PHASE_NAMES,
        }
    }

    pub fn phase_name(&self, phase: usize) -> Option<&'static str> {
        self.phase_names().get(phase).copied()
    }

    pub fn phase_index(&self, name: &str) -> Result<usize, PhaseError> {
        self.phase_names()
            .iter()
            .position(|n| *n == name)
            .ok_or_else(|| PhaseError::UnknownPhase {
                name: name.to_string(),
                encounter: self.encounter(),
            })
    }

    /// Whether [`build`](Self::build) looks at checkpoint events for this fight
    pub fn needs_checkpoints(&self, fight: &Fight) -> bool {
        matches!(self, PhaseModel::Dsu) && fight.last_phase != 0
    }

    /// Build the timeline of one fight of this model's encounter
    pub fn build(
        &self,
        fight: &Fight,
        checkpoints: &CheckpointEvents,
    ) -> Result<Timeline, PhaseError> {
        let expected = self.encounter();
        if fight.encounter_id != expected.id() {
            return Err(PhaseError::EncounterMismatch {
                expected,
                found: fight.encounter_id,
                fight: fight.id,
            });
        }

        let events = match self {
            PhaseModel::Dsu => dsu::checkpoints(fight, checkpoints),
            PhaseModel::SinglePhase(_) => vec![Event::marker(fight.start_time, fight.id)],
        };

        tracing::debug!(
            fight = fight.id,
            encounter = %expected,
            checkpoints = events.len(),
            "Built phase timeline"
        );
        Ok(Timeline::new(fight.id, events))
    }
}
