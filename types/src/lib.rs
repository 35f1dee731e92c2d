//! Shared configuration types for fightline
//!
//! This crate contains serializable configuration types that are shared between
//! the reconstruction library (fightline-core) and its front ends.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Page size used by the log hosting service for event queries.
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Application configuration.
///
/// Note: Persistence methods (load/save) are provided by fightline-core via the
/// `AppConfigExt` trait, as they require platform-specific dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Report dump loaded when `load` is called without a path.
    #[serde(default)]
    pub dump_path: Option<String>,

    /// Encounter key (e.g. "dsu") used when `load` is called without one.
    #[serde(default = "default_encounter")]
    pub default_encounter: String,

    /// Number of events served per page by in-memory sources.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub debug_logging: bool,
}

fn default_encounter() -> String {
    "dsu".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dump_path: None,
            default_encounter: default_encounter(),
            page_size: default_page_size(),
            debug_logging: false,
        }
    }
}

impl AppConfig {
    /// Page size clamped to at least one event per page.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}
