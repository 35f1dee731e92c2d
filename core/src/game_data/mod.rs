mod encounters;

pub use encounters::{Encounter, UnknownEncounter};
