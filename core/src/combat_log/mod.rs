mod collection;
mod combat_event;
mod error;
mod parser;
mod selector;

pub use collection::EventCollection;
pub use combat_event::*;
pub use error::{CollectionError, ParseError, SelectorError};
pub use parser::{parse_map, parse_record};
pub use selector::AbilitySelector;
