use super::*;
use serde_json::json;

#[test]
fn test_parse_aura_record() {
    let event = parse_record(json!({
        "timestamp": 2211161,
        "type": "applybuff",
        "sourceID": 23,
        "targetID": 157,
        "abilityGameID": 1001193,
        "fight": 2,
        "duration": 10000
    }))
    .unwrap();

    assert_eq!(event.time, 2211161);
    assert_eq!(event.kind, EventKind::ApplyBuff);
    assert_eq!(event.source, 23);
    assert_eq!(event.target, 157);
    assert_eq!(event.fight, 2);
    assert_eq!(event.ability_id(), Some(1001193));
    assert_eq!(event.duration(), Some(10000));
    assert_eq!(event.attributes.len(), 2);
}

#[test]
fn test_parse_missing_actors_uses_sentinel() {
    let event = parse_record(json!({
        "timestamp": 10,
        "type": "encounterstart",
        "fight": 1
    }))
    .unwrap();

    assert_eq!(event.source, NO_ACTOR);
    assert_eq!(event.target, NO_ACTOR);
    assert_eq!(event.kind.as_str(), "encounterstart");
    assert!(matches!(event.kind, EventKind::Other(_)));
}

#[test]
fn test_parse_targetability_flag() {
    let event = parse_record(json!({
        "timestamp": 500,
        "type": "targetabilityupdate",
        "sourceID": 40,
        "targetID": 40,
        "targetable": 1,
        "fight": 3
    }))
    .unwrap();

    assert_eq!(event.kind, EventKind::TargetabilityUpdate);
    assert_eq!(event.targetable(), Some(true));
}

#[test]
fn test_parse_secondary_instance() {
    let clone = parse_record(json!({
        "timestamp": 900,
        "type": "damage",
        "sourceID": 40,
        "sourceInstance": 2,
        "targetID": 5,
        "fight": 3
    }))
    .unwrap();
    let primary = parse_record(json!({
        "timestamp": 900,
        "type": "damage",
        "sourceID": 40,
        "targetID": 5,
        "fight": 3
    }))
    .unwrap();

    assert!(clone.has_instance());
    assert!(!primary.has_instance());
}

#[test]
fn test_parse_keeps_nested_attributes() {
    let event = parse_record(json!({
        "timestamp": 0,
        "type": "combatantinfo",
        "sourceID": 5,
        "fight": 1,
        "auras": [{"source": 5, "ability": 1000048, "stacks": 1}]
    }))
    .unwrap();

    assert!(matches!(
        event.attributes.get(attr::AURAS),
        Some(AttrValue::Json(Value::Array(items))) if items.len() == 1
    ));
}

#[test]
fn test_parse_whole_float_timestamp() {
    let event = parse_record(json!({"timestamp": 1200.0, "type": "cast", "fight": 1})).unwrap();
    assert_eq!(event.time, 1200);
}

#[test]
fn test_parse_rejects_missing_fight() {
    let err = parse_record(json!({"timestamp": 1, "type": "cast"})).unwrap_err();
    assert!(matches!(err, ParseError::MissingField { field: "fight" }));
}

#[test]
fn test_parse_rejects_non_integer_timestamp() {
    let err = parse_record(json!({"timestamp": "soon", "type": "cast", "fight": 1})).unwrap_err();
    assert!(matches!(err, ParseError::InvalidValue { field: "timestamp", .. }));
}

#[test]
fn test_parse_rejects_non_object() {
    assert!(matches!(parse_record(json!([1, 2])), Err(ParseError::NotAnObject)));
}
