pub mod auras;
pub mod combat_log;
pub mod context;
pub mod game_data;
pub mod phases;
pub mod report;
pub mod source;

// Re-exports for convenience
pub use auras::{AuraIndex, CombatantSnapshot, SnapshotAura};
pub use combat_log::*;
pub use context::{AppConfig, AppConfigExt, ConfigError};
pub use game_data::{Encounter, UnknownEncounter};
pub use phases::{PhaseError, PhaseModel, Timeline};
pub use report::{Ability, Actor, ActorType, Fight, MasterData, Report, ReportError, ReportId};
pub use source::{CheckpointEvents, DataSource, MemorySource, ReportDump, ReportInfo, SourceError};
