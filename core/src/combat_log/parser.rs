//! Normalizes raw event records from the log host into [`Event`]s.
//!
//! A record is a flat JSON object. The fixed core (`timestamp`, `type`,
//! `sourceID`, `targetID`, `fight`) becomes typed fields; every other key is
//! kept in the event's [`Attributes`].

use serde_json::{Map, Value};

use super::*;

#[cfg(test)]
mod tests;

const TIMESTAMP: &str = "timestamp";
const TYPE: &str = "type";
const SOURCE_ID: &str = "sourceID";
const TARGET_ID: &str = "targetID";
const FIGHT: &str = "fight";

/// Parse one raw record
pub fn parse_record(value: Value) -> Result<Event, ParseError> {
    match value {
        Value::Object(map) => parse_map(map),
        _ => Err(ParseError::NotAnObject),
    }
}

pub fn parse_map(mut map: Map<String, Value>) -> Result<Event, ParseError> {
    let time = take_required_i64(&mut map, TIMESTAMP)?;
    let kind = match map.remove(TYPE) {
        Some(Value::String(s)) => EventKind::from(s.as_str()),
        Some(other) => {
            return Err(ParseError::InvalidValue {
                field: TYPE,
                detail: format!("expected a string, got {other}"),
            });
        }
        None => return Err(ParseError::MissingField { field: TYPE }),
    };
    let source = take_optional_i64(&mut map, SOURCE_ID)?.unwrap_or(NO_ACTOR);
    let target = take_optional_i64(&mut map, TARGET_ID)?.unwrap_or(NO_ACTOR);
    let fight = take_required_i64(&mut map, FIGHT)?;

    let mut attributes = Attributes::new();
    for (key, value) in map {
        attributes.insert(key, AttrValue::from(value));
    }

    Ok(Event {
        time,
        kind,
        source,
        target,
        fight,
        attributes,
    })
}

fn take_required_i64(map: &mut Map<String, Value>, field: &'static str) -> Result<i64, ParseError> {
    take_optional_i64(map, field)?.ok_or(ParseError::MissingField { field })
}

fn take_optional_i64(
    map: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<i64>, ParseError> {
    match map.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            // Timestamps occasionally arrive as whole floats
            .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| ParseError::InvalidValue {
                field,
                detail: format!("expected an integer, got {value}"),
            }),
    }
}
