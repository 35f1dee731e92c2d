//! Report master data: actor and ability id/name tables.

use hashbrown::HashMap;
use serde::Deserialize;

use super::null_as_default;
use crate::combat_log::{AbilityId, ActorId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActorType {
    Player,
    Npc,
    Pet,
    #[default]
    Other,
}

impl From<&str> for ActorType {
    fn from(s: &str) -> Self {
        match s {
            "Player" => ActorType::Player,
            "NPC" | "Boss" => ActorType::Npc,
            "Pet" => ActorType::Pet,
            _ => ActorType::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    #[serde(rename = "gameID", default, deserialize_with = "null_as_default")]
    pub game_id: i64,
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "actor_type")]
    pub actor_type: ActorType,
    #[serde(rename = "subType", default, deserialize_with = "null_as_default")]
    pub sub_type: String,
}

fn actor_type<'de, D: serde::Deserializer<'de>>(d: D) -> Result<ActorType, D::Error> {
    let s: Option<String> = Option::deserialize(d)?;
    Ok(s.as_deref().map(ActorType::from).unwrap_or_default())
}

impl Actor {
    pub fn is_player(&self) -> bool {
        self.actor_type == ActorType::Player
    }

    pub fn is_npc(&self) -> bool {
        self.actor_type == ActorType::Npc
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ability {
    #[serde(rename = "gameID")]
    pub id: AbilityId,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "MasterDataRaw")]
pub struct MasterData {
    actors: Vec<Actor>,
    abilities: Vec<Ability>,
    actor_index: HashMap<ActorId, usize>,
    ability_index: HashMap<AbilityId, usize>,
}

#[derive(Deserialize)]
struct MasterDataRaw {
    #[serde(default)]
    actors: Vec<Actor>,
    #[serde(default)]
    abilities: Vec<Ability>,
}

impl From<MasterDataRaw> for MasterData {
    fn from(raw: MasterDataRaw) -> Self {
        MasterData::new(raw.actors, raw.abilities)
    }
}

impl MasterData {
    pub fn new(actors: Vec<Actor>, abilities: Vec<Ability>) -> Self {
        // First entry wins on duplicate ids
        let mut actor_index = HashMap::with_capacity(actors.len());
        for (idx, actor) in actors.iter().enumerate() {
            actor_index.entry(actor.id).or_insert(idx);
        }
        let mut ability_index = HashMap::with_capacity(abilities.len());
        for (idx, ability) in abilities.iter().enumerate() {
            ability_index.entry(ability.id).or_insert(idx);
        }
        Self {
            actors,
            abilities,
            actor_index,
            ability_index,
        }
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    // --- Actors ---

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actor_index.get(&id).map(|&idx| &self.actors[idx])
    }

    pub fn actor_name(&self, id: ActorId) -> Option<&str> {
        self.actor(id).map(|a| a.name.as_str())
    }

    /// Every actor id carrying this display name (pets and adds often share names)
    pub fn actor_ids(&self, name: &str) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|a| a.name == name)
            .map(|a| a.id)
            .collect()
    }

    pub fn actor_ids_for(&self, names: &[&str]) -> Vec<ActorId> {
        names.iter().flat_map(|name| self.actor_ids(name)).collect()
    }

    /// Name for display, falling back to the raw id
    pub fn actor_display_name(&self, id: ActorId) -> String {
        self.actor_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    // --- Abilities ---

    pub fn ability_name(&self, id: AbilityId) -> Option<&str> {
        self.ability_index
            .get(&id)
            .map(|&idx| self.abilities[idx].name.as_str())
    }

    pub fn ability_ids(&self, name: &str) -> Vec<AbilityId> {
        self.abilities
            .iter()
            .filter(|a| a.name == name)
            .map(|a| a.id)
            .collect()
    }

    pub fn ability_display_name(&self, id: AbilityId) -> String {
        self.ability_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }
}
