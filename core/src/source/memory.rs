//! In-memory data source over a whole report dump.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{DataSource, Page, SourceError, collect_pages};
use crate::combat_log::{Event, EventKind, FightId, parse_record};
use crate::context::DEFAULT_PAGE_SIZE;
use crate::game_data::Encounter;
use crate::report::{Fight, MasterData};

/// On-disk shape of a report dump
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDump {
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub end_time: i64,
    pub master_data: MasterData,
    #[serde(default)]
    pub fights: Vec<Fight>,
    /// Raw event records, normalised on load
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

/// Header information of a loaded report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInfo {
    pub code: String,
    pub title: String,
    /// Wall-clock start of the report, unix milliseconds
    pub start_time: i64,
    pub end_time: i64,
}

impl ReportInfo {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.start_time)
    }
}

/// Serves a fully loaded report. Event queries still go through the page
/// assembler so page-size behaviour matches the hosted service.
#[derive(Debug, Clone)]
pub struct MemorySource {
    info: ReportInfo,
    master: MasterData,
    fights: Vec<Fight>,
    /// Sorted by time (stable)
    events: Vec<Event>,
    page_size: usize,
}

impl MemorySource {
    pub fn new(info: ReportInfo, master: MasterData, fights: Vec<Fight>, mut events: Vec<Event>) -> Self {
        events.sort_by_key(|e| e.time);
        Self {
            info,
            master,
            fights,
            events,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn from_dump(dump: ReportDump) -> Result<Self, SourceError> {
        let events = dump
            .events
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                parse_record(raw).map_err(|source| SourceError::Record { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let info = ReportInfo {
            code: dump.code,
            title: dump.title,
            start_time: dump.start_time,
            end_time: dump.end_time,
        };
        Ok(Self::new(info, dump.master_data, dump.fights, events))
    }

    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let dump: ReportDump = serde_json::from_str(json)?;
        Self::from_dump(dump)
    }

    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path).map_err(|source| SourceError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            fights = source.fights.len(),
            events = source.events.len(),
            "Loaded report dump"
        );
        Ok(source)
    }

    pub fn info(&self) -> &ReportInfo {
        &self.info
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// One page of matching events starting at `start`.
    ///
    /// A page never splits events sharing a timestamp, so the next page can
    /// start strictly after the last event returned.
    fn page(&self, fight: &Fight, kinds: &[EventKind], start: i64) -> Page {
        let matches = |e: &&Event| {
            e.fight == fight.id
                && e.time <= fight.end_time
                && (kinds.is_empty() || kinds.contains(&e.kind))
        };
        let from = self.events.partition_point(|e| e.time < start);
        let mut candidates = self.events[from..].iter().filter(matches).peekable();

        let mut data = Vec::new();
        while let Some(event) = candidates.next() {
            data.push(event.clone());
            if data.len() >= self.page_size
                && candidates.peek().is_none_or(|next| next.time != event.time)
            {
                break;
            }
        }

        Page {
            data,
            next_page_timestamp: candidates.peek().map(|e| e.time),
        }
    }
}

impl DataSource for MemorySource {
    fn master_data(&self) -> Result<MasterData, SourceError> {
        Ok(self.master.clone())
    }

    fn fights(&self, encounter: Encounter) -> Result<Vec<Fight>, SourceError> {
        Ok(self
            .fights
            .iter()
            .filter(|f| f.encounter_id == encounter.id())
            .cloned()
            .collect())
    }

    fn fetch_fight(
        &self,
        encounter: Encounter,
        fight_id: FightId,
    ) -> Result<Option<Fight>, SourceError> {
        Ok(self
            .fights
            .iter()
            .find(|f| f.id == fight_id && f.encounter_id == encounter.id())
            .cloned())
    }

    fn fetch_typed_events(
        &self,
        fight: &Fight,
        kinds: &[EventKind],
    ) -> Result<Vec<Event>, SourceError> {
        collect_pages(fight.start_time, |start| Ok(self.page(fight, kinds, start)))
    }
}
