use serde_json::Value;

use crate::combat_log::{AbilityId, ActorId, AttrValue, Event, EventKind, attr};
use crate::report::Fight;

/// One aura a combatant carried into the pull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotAura {
    pub ability: AbilityId,
    pub stacks: i64,
}

/// Pre-pull state of one combatant, decoded from its `combatantinfo` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatantSnapshot {
    pub actor: ActorId,
    pub auras: Vec<SnapshotAura>,
}

impl CombatantSnapshot {
    /// Decode the `auras` list of a combatant info event. Entries without an
    /// ability id are skipped; a missing stack count means a single stack.
    pub fn from_event(event: &Event) -> Self {
        let actor = event.source;
        let auras = match event.attributes.get(attr::AURAS) {
            Some(AttrValue::Json(Value::Array(items))) => items
                .iter()
                .filter_map(|item| {
                    let aura = decode_aura(item);
                    if aura.is_none() {
                        tracing::warn!(actor, entry = %item, "Skipping malformed pre-pull aura");
                    }
                    aura
                })
                .collect(),
            _ => Vec::new(),
        };
        Self { actor, auras }
    }

    /// Synthetic applies at the pull, each lasting the whole fight
    pub fn prepull_applies<'a>(&'a self, fight: &'a Fight) -> impl Iterator<Item = Event> + 'a {
        let duration = fight.duration_ms();
        self.auras.iter().map(move |aura| {
            Event::new(
                fight.start_time,
                EventKind::ApplyBuff,
                self.actor,
                self.actor,
                fight.id,
            )
            .with_attr(attr::ABILITY, aura.ability)
            .with_attr(attr::STACKS, aura.stacks)
            .with_attr(attr::DURATION, duration)
        })
    }
}

fn decode_aura(item: &Value) -> Option<SnapshotAura> {
    let ability = item.get("ability")?.as_i64()?;
    let stacks = item.get("stacks").and_then(Value::as_i64).unwrap_or(1);
    Some(SnapshotAura { ability, stacks })
}
