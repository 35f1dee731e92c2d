use std::fmt;
use std::str::FromStr;

use super::{AbilityId, SelectorError};
use crate::report::MasterData;

/// Selects abilities either by game id or by display name.
///
/// A name may resolve to several ids (the log host assigns separate ids to
/// the buff and debuff variants of the same effect).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbilitySelector {
    Id(AbilityId),
    Name(String),
}

impl AbilitySelector {
    /// All ability ids this selector refers to. Unknown names resolve to nothing.
    pub fn resolve(&self, master: &MasterData) -> Vec<AbilityId> {
        match self {
            AbilitySelector::Id(id) => vec![*id],
            AbilitySelector::Name(name) => master.ability_ids(name),
        }
    }

    /// Resolve a list of selectors into one deduplicated id list (first-seen order)
    pub fn resolve_all(selectors: &[AbilitySelector], master: &MasterData) -> Vec<AbilityId> {
        let mut ids = Vec::new();
        for id in selectors.iter().flat_map(|s| s.resolve(master)) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

impl From<AbilityId> for AbilitySelector {
    fn from(id: AbilityId) -> Self {
        AbilitySelector::Id(id)
    }
}

impl From<&str> for AbilitySelector {
    fn from(name: &str) -> Self {
        AbilitySelector::Name(name.to_string())
    }
}

impl From<String> for AbilitySelector {
    fn from(name: String) -> Self {
        AbilitySelector::Name(name)
    }
}

impl fmt::Display for AbilitySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilitySelector::Id(id) => write!(f, "#{id}"),
            AbilitySelector::Name(name) => f.write_str(name),
        }
    }
}

/// Parses user input: `#123` or `id:123` select by id, anything else by name.
impl FromStr for AbilitySelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(SelectorError::Malformed {
                input: s.to_string(),
                reason: "expected an ability name or id",
            });
        }

        let id_part = input
            .strip_prefix('#')
            .or_else(|| input.strip_prefix("id:"));

        match id_part {
            Some(digits) => digits
                .trim()
                .parse::<AbilityId>()
                .map(AbilitySelector::Id)
                .map_err(|_| SelectorError::Malformed {
                    input: s.to_string(),
                    reason: "id selectors must be followed by an integer",
                }),
            None => Ok(AbilitySelector::Name(input.to_string())),
        }
    }
}
