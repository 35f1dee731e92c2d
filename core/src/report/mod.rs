//! The report session: one report, one encounter, one data source.
//!
//! A [`Report`] owns the fight registry and the per-fight caches (events,
//! phase timelines, aura indexes). Caches are filled on first use and never
//! change afterwards; concurrent first use may build twice, the first
//! result stored wins.
//!
//! Phase queries live in `phases.rs`, aura queries in `auras.rs`.

mod auras;
mod error;
mod fight;
mod master;
mod phases;

pub use error::ReportError;
pub use fight::Fight;
pub use master::{Ability, Actor, ActorType, MasterData};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashMap;

use crate::auras::AuraIndex;
use crate::combat_log::{Event, EventCollection, FightId};
use crate::game_data::Encounter;
use crate::phases::{PhaseModel, Timeline};
use crate::source::DataSource;

static NEXT_REPORT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an open report. Event collections of
/// different reports never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportId(u64);

impl ReportId {
    fn next() -> Self {
        ReportId(NEXT_REPORT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host exports write `null` where a value does not apply (trash pulls have
/// no boss percentage). Treat it like a missing key.
pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    Ok(<Option<T> as serde::Deserialize>::deserialize(d)?.unwrap_or_default())
}

type FightCache<T> = RwLock<HashMap<FightId, Arc<T>>>;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Return the cached value for `fight`, building it on a miss
fn cached<T>(
    cache: &FightCache<T>,
    fight: FightId,
    build: impl FnOnce() -> Result<T, ReportError>,
) -> Result<Arc<T>, ReportError> {
    if let Some(hit) = read(cache).get(&fight) {
        return Ok(Arc::clone(hit));
    }
    let built = Arc::new(build()?);
    Ok(Arc::clone(write(cache).entry(fight).or_insert(built)))
}

pub struct Report {
    id: ReportId,
    code: String,
    phase_model: PhaseModel,
    source: Arc<dyn DataSource>,
    master: MasterData,
    fights: RwLock<HashMap<FightId, Arc<Fight>>>,
    events: FightCache<Vec<Arc<Event>>>,
    timelines: FightCache<Timeline>,
    auras: FightCache<AuraIndex>,
}

impl Report {
    /// Open a report for one encounter. Fails when the encounter has no
    /// phase model or the source cannot supply master data and fights.
    pub fn open(
        code: impl Into<String>,
        encounter: Encounter,
        source: Arc<dyn DataSource>,
    ) -> Result<Self, ReportError> {
        let code = code.into();
        let phase_model = PhaseModel::for_encounter(encounter)?;
        let master = source.master_data()?;
        let fights: HashMap<_, _> = source
            .fights(encounter)?
            .into_iter()
            .map(|f| (f.id, Arc::new(f)))
            .collect();

        let id = ReportId::next();
        tracing::info!(
            report = %id,
            code = %code,
            encounter = %encounter,
            fights = fights.len(),
            actors = master.actors().len(),
            "Opened report"
        );

        Ok(Self {
            id,
            code,
            phase_model,
            source,
            master,
            fights: RwLock::new(fights),
            events: RwLock::default(),
            timelines: RwLock::default(),
            auras: RwLock::default(),
        })
    }

    pub fn id(&self) -> ReportId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn encounter(&self) -> Encounter {
        self.phase_model.encounter()
    }

    pub fn phase_model(&self) -> PhaseModel {
        self.phase_model
    }

    pub fn master(&self) -> &MasterData {
        &self.master
    }

    // --- Fights ---

    /// A fight already known to this session, without asking the source
    pub fn known_fight(&self, id: FightId) -> Option<Arc<Fight>> {
        read(&self.fights).get(&id).cloned()
    }

    /// A fight by id, asking the source when it is not known yet.
    /// `Ok(None)` when the source has no such fight either.
    pub fn fight(&self, id: FightId) -> Result<Option<Arc<Fight>>, ReportError> {
        if let Some(fight) = self.known_fight(id) {
            return Ok(Some(fight));
        }

        let Some(fetched) = self.source.fetch_fight(self.encounter(), id)? else {
            tracing::debug!(report = %self.id, fight = id, "Fight not found");
            return Ok(None);
        };
        tracing::debug!(report = %self.id, fight = id, "Fetched new fight");
        let fetched = Arc::new(fetched);
        Ok(Some(Arc::clone(
            write(&self.fights).entry(id).or_insert(fetched),
        )))
    }

    /// Every known fight, ordered by id
    pub fn fights(&self) -> Vec<Arc<Fight>> {
        let mut fights: Vec<_> = read(&self.fights).values().cloned().collect();
        fights.sort_by_key(|f| f.id);
        fights
    }

    pub fn first_fight(&self) -> Option<Arc<Fight>> {
        self.fights().into_iter().next()
    }

    pub fn last_fight(&self) -> Option<Arc<Fight>> {
        self.fights().pop()
    }

    // --- Events ---

    /// Every event of one fight, time ordered. Empty for unknown fights.
    pub fn events(&self, fight_id: FightId) -> Result<EventCollection<'_>, ReportError> {
        let Some(fight) = self.fight(fight_id)? else {
            return Ok(EventCollection::empty(self));
        };
        let events = cached(&self.events, fight_id, || {
            let events = self.source.fetch_typed_events(&fight, &[])?;
            tracing::debug!(fight = fight_id, count = events.len(), "Cached fight events");
            Ok(events.into_iter().map(Arc::new).collect())
        })?;
        Ok(EventCollection::new(self, events.to_vec()))
    }

    /// Events of every known fight, fight by fight
    pub fn all_events(&self) -> Result<EventCollection<'_>, ReportError> {
        let mut all = EventCollection::empty(self);
        for fight in self.fights() {
            all = all.concat(&self.events(fight.id)?)?;
        }
        Ok(all)
    }

    /// Collection over caller-supplied events, tagged with this report
    pub fn collect(&self, events: impl IntoIterator<Item = Event>) -> EventCollection<'_> {
        EventCollection::new(self, events.into_iter().map(Arc::new).collect())
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("id", &self.id)
            .field("code", &self.code)
            .field("phase_model", &self.phase_model)
            .field("fights", &read(&self.fights).len())
            .finish_non_exhaustive()
    }
}
