use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::context::{IStr, intern, resolve};

pub type ActorId = i64;
pub type FightId = i64;
pub type AbilityId = i64;

/// Source/target of events that have no actor (markers, environment)
pub const NO_ACTOR: ActorId = -1;

/// Well-known attribute keys carried by the log host's event records
pub mod attr {
    pub const ABILITY: &str = "abilityGameID";
    pub const EXTRA_ABILITY: &str = "extraAbilityGameID";
    pub const STACKS: &str = "stacks";
    pub const DURATION: &str = "duration";
    pub const TARGETABLE: &str = "targetable";
    pub const SOURCE_INSTANCE: &str = "sourceInstance";
    pub const TARGET_INSTANCE: &str = "targetInstance";
    pub const AURAS: &str = "auras";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ApplyBuff,
    ApplyDebuff,
    RemoveBuff,
    RemoveDebuff,
    ApplyBuffStack,
    ApplyDebuffStack,
    RemoveBuffStack,
    RemoveDebuffStack,
    Death,
    TargetabilityUpdate,
    CombatantInfo,
    Cast,
    BeginCast,
    Damage,
    Heal,
    /// Synthetic marker with no payload beyond its timestamp
    Time,
    Other(IStr),
}

/// Kinds fetched to build an aura index
pub const AURA_KINDS: &[EventKind] = &[
    EventKind::ApplyBuff,
    EventKind::ApplyDebuff,
    EventKind::RemoveBuff,
    EventKind::RemoveDebuff,
];

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ApplyBuff => "applybuff",
            EventKind::ApplyDebuff => "applydebuff",
            EventKind::RemoveBuff => "removebuff",
            EventKind::RemoveDebuff => "removedebuff",
            EventKind::ApplyBuffStack => "applybuffstack",
            EventKind::ApplyDebuffStack => "applydebuffstack",
            EventKind::RemoveBuffStack => "removebuffstack",
            EventKind::RemoveDebuffStack => "removedebuffstack",
            EventKind::Death => "death",
            EventKind::TargetabilityUpdate => "targetabilityupdate",
            EventKind::CombatantInfo => "combatantinfo",
            EventKind::Cast => "cast",
            EventKind::BeginCast => "begincast",
            EventKind::Damage => "damage",
            EventKind::Heal => "heal",
            EventKind::Time => "time",
            EventKind::Other(name) => resolve(*name),
        }
    }

    /// Buff/debuff application (the only kinds that make an aura active)
    pub fn is_apply(&self) -> bool {
        matches!(self, EventKind::ApplyBuff | EventKind::ApplyDebuff)
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, EventKind::RemoveBuff | EventKind::RemoveDebuff)
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        match s {
            "applybuff" => EventKind::ApplyBuff,
            "applydebuff" => EventKind::ApplyDebuff,
            "removebuff" => EventKind::RemoveBuff,
            "removedebuff" => EventKind::RemoveDebuff,
            "applybuffstack" => EventKind::ApplyBuffStack,
            "applydebuffstack" => EventKind::ApplyDebuffStack,
            "removebuffstack" => EventKind::RemoveBuffStack,
            "removedebuffstack" => EventKind::RemoveDebuffStack,
            "death" => EventKind::Death,
            "targetabilityupdate" => EventKind::TargetabilityUpdate,
            "combatantinfo" => EventKind::CombatantInfo,
            "cast" => EventKind::Cast,
            "begincast" => EventKind::BeginCast,
            "damage" => EventKind::Damage,
            "heal" => EventKind::Heal,
            "time" => EventKind::Time,
            other => EventKind::Other(intern(other)),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Value of an extension attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Nested data (arrays, objects) kept verbatim
    Json(serde_json::Value),
}

impl AttrValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Accepts both `true`/`false` and the `1`/`0` form some records use
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            AttrValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => AttrValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => AttrValue::Int(i),
                None => AttrValue::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => AttrValue::Text(s),
            other => AttrValue::Json(other),
        }
    }
}

/// Encounter-specific fields beyond the fixed event core
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(AttrValue::as_i64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One timestamped record of a fight.
///
/// Events are treated as immutable once built; derived views (named
/// projections, synthetic markers) are always new values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Milliseconds since the start of the report
    pub time: i64,
    pub kind: EventKind,
    pub source: ActorId,
    pub target: ActorId,
    pub fight: FightId,
    pub attributes: Attributes,
}

impl Event {
    pub fn new(time: i64, kind: EventKind, source: ActorId, target: ActorId, fight: FightId) -> Self {
        Self {
            time,
            kind,
            source,
            target,
            fight,
            attributes: Attributes::new(),
        }
    }

    /// Synthetic `time` marker (phase starts, fight starts)
    pub fn marker(time: i64, fight: FightId) -> Self {
        Self::new(time, EventKind::Time, NO_ACTOR, NO_ACTOR, fight)
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn ability_id(&self) -> Option<AbilityId> {
        self.attributes.int(attr::ABILITY)
    }

    pub fn extra_ability_id(&self) -> Option<AbilityId> {
        self.attributes.int(attr::EXTRA_ABILITY)
    }

    pub fn stacks(&self) -> Option<i64> {
        self.attributes.int(attr::STACKS)
    }

    pub fn duration(&self) -> Option<i64> {
        self.attributes.int(attr::DURATION)
    }

    pub fn targetable(&self) -> Option<bool> {
        self.attributes.get(attr::TARGETABLE).and_then(AttrValue::as_bool)
    }

    /// Events emitted by a secondary instance of an actor (clones, adds sharing an id)
    pub fn has_instance(&self) -> bool {
        self.attributes.contains(attr::SOURCE_INSTANCE)
            || self.attributes.contains(attr::TARGET_INSTANCE)
    }

    pub fn is_marker(&self) -> bool {
        self.kind == EventKind::Time
    }
}

/// Named projection of an [`Event`]: ids replaced by display names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedEvent {
    pub time: i64,
    /// Milliseconds since the owning fight started
    pub fight_time: i64,
    pub kind: EventKind,
    pub source: String,
    pub target: String,
    pub fight: FightId,
    pub ability: Option<String>,
    pub extra_ability: Option<String>,
    pub attributes: Attributes,
}

impl fmt::Display for NamedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.fight_time as f64 / 1000.0;
        write!(f, "[{secs:>8.1}s] {:<12} {} -> {}", self.kind, self.source, self.target)?;
        if let Some(ability) = &self.ability {
            write!(f, " ({ability})")?;
        }
        Ok(())
    }
}
