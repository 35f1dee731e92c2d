use thiserror::Error;

use crate::combat_log::FightId;
use crate::game_data::Encounter;

/// Errors from phase model selection and timeline construction
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("no phase model for {encounter}")]
    UnsupportedEncounter { encounter: Encounter },

    #[error("fight {fight} belongs to encounter {found}, not {expected}")]
    EncounterMismatch {
        expected: Encounter,
        found: i64,
        fight: FightId,
    },

    #[error("{encounter} has no phase named '{name}'")]
    UnknownPhase { name: String, encounter: Encounter },
}
