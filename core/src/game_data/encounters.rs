//! Encounter identification data
//!
//! Maps the log host's numeric encounter ids and short user-facing keys to
//! the encounters this crate knows how to reconstruct.

use std::fmt;
use std::str::FromStr;

use phf::phf_map;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encounter {
    /// Dragonsong's Reprise (Ultimate)
    Dsu,
    /// The Epic of Alexander (Ultimate)
    Tea,
    /// The Unending Coil of Bahamut (Ultimate)
    Ucob,
    /// The Weapon's Refrain (Ultimate)
    Uwu,
    P1s,
    P2s,
    P3s,
    P4sPart1,
    P4sPart2,
}

/// Lookup table indexed by the log host's encounter id
static ENCOUNTER_BY_ID: phf::Map<i64, Encounter> = phf_map! {
    1065i64 => Encounter::Dsu,
    1062i64 => Encounter::Tea,
    1060i64 => Encounter::Ucob,
    1061i64 => Encounter::Uwu,
    78i64 => Encounter::P1s,
    79i64 => Encounter::P2s,
    80i64 => Encounter::P3s,
    81i64 => Encounter::P4sPart1,
    82i64 => Encounter::P4sPart2,
};

/// Lookup table indexed by short key (config files, CLI input)
static ENCOUNTER_BY_KEY: phf::Map<&'static str, Encounter> = phf_map! {
    "dsu" => Encounter::Dsu,
    "tea" => Encounter::Tea,
    "ucob" => Encounter::Ucob,
    "uwu" => Encounter::Uwu,
    "p1s" => Encounter::P1s,
    "p2s" => Encounter::P2s,
    "p3s" => Encounter::P3s,
    "p4s1" => Encounter::P4sPart1,
    "p4s2" => Encounter::P4sPart2,
};

impl Encounter {
    pub fn from_id(id: i64) -> Option<Self> {
        ENCOUNTER_BY_ID.get(&id).copied()
    }

    /// Encounter id used by the log host
    pub fn id(self) -> i64 {
        match self {
            Encounter::Dsu => 1065,
            Encounter::Tea => 1062,
            Encounter::Ucob => 1060,
            Encounter::Uwu => 1061,
            Encounter::P1s => 78,
            Encounter::P2s => 79,
            Encounter::P3s => 80,
            Encounter::P4sPart1 => 81,
            Encounter::P4sPart2 => 82,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Encounter::Dsu => "dsu",
            Encounter::Tea => "tea",
            Encounter::Ucob => "ucob",
            Encounter::Uwu => "uwu",
            Encounter::P1s => "p1s",
            Encounter::P2s => "p2s",
            Encounter::P3s => "p3s",
            Encounter::P4sPart1 => "p4s1",
            Encounter::P4sPart2 => "p4s2",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encounter::Dsu => "Dragonsong's Reprise",
            Encounter::Tea => "The Epic of Alexander",
            Encounter::Ucob => "The Unending Coil of Bahamut",
            Encounter::Uwu => "The Weapon's Refrain",
            Encounter::P1s => "Erichthonios (Savage)",
            Encounter::P2s => "Hippokampos (Savage)",
            Encounter::P3s => "Phoinix (Savage)",
            Encounter::P4sPart1 => "Hesperos I (Savage)",
            Encounter::P4sPart2 => "Hesperos II (Savage)",
        }
    }
}

impl fmt::Display for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown encounter '{0}'")]
pub struct UnknownEncounter(pub String);

/// Accepts a short key ("dsu") or a numeric encounter id ("1065").
impl FromStr for Encounter {
    type Err = UnknownEncounter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if let Some(encounter) = ENCOUNTER_BY_KEY.get(key.as_str()) {
            return Ok(*encounter);
        }
        key.parse::<i64>()
            .ok()
            .and_then(Encounter::from_id)
            .ok_or_else(|| UnknownEncounter(s.to_string()))
    }
}
