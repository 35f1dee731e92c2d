mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use fightline_core::{
    AbilitySelector, CollectionError, Event, EventKind, MemorySource, PhaseError, Report,
    ReportError, SourceError,
};

use common::{fixture_path, fixture_source, open_dsu};

const MEDICATED: i64 = 1000049;
const RAMPART: i64 = 1001191;
const REPRISAL_DEBUFF: i64 = 1001193;

fn at(time: i64, fight: i64) -> Event {
    Event::marker(time, fight)
}

// ═══════════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_open_keeps_only_encounter_fights() {
    let report = open_dsu(fixture_source());

    let ids: Vec<_> = report.fights().iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(report.first_fight().unwrap().id, 1);
    assert_eq!(report.last_fight().unwrap().id, 3);
    assert_eq!(report.code(), "aBcD1234eFgH");
}

#[test]
fn test_unknown_fight_is_absent_not_an_error() {
    let report = open_dsu(fixture_source());

    // Fight 4 exists in the dump but belongs to another encounter
    assert!(report.fight(4).unwrap().is_none());
    assert!(report.fight(99).unwrap().is_none());
    assert!(report.timeline(99).unwrap().is_none());
    assert!(report.phase(&at(1_000, 99)).unwrap().is_none());
    assert!(report.applied_at(&at(1_000, 99)).unwrap().is_empty());
    assert!(report.events(99).unwrap().is_empty());
    assert!(report.aura_on("Rampart", 99).unwrap().is_empty());
}

#[test]
fn test_unsupported_encounter_fails_to_open() {
    let err = Report::open("x", fightline_core::Encounter::Ucob, fixture_source()).unwrap_err();
    assert!(matches!(
        err,
        ReportError::Phase(PhaseError::UnsupportedEncounter { .. })
    ));
}

#[test]
fn test_load_from_copied_dump() {
    let dir = tempfile::tempdir().unwrap();
    let copy = dir.path().join("report.json");
    std::fs::copy(fixture_path(), &copy).unwrap();

    let source = MemorySource::load(&copy).unwrap().with_page_size(2);
    let report = open_dsu(Arc::new(source));
    assert_eq!(report.events(1).unwrap().len(), 9);

    let err = MemorySource::load(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, SourceError::ReadFile { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// Event Collections
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_concat_across_reports_is_rejected() {
    let source = fixture_source();
    let first = open_dsu(Arc::clone(&source));
    let second = open_dsu(source);

    let ours = first.events(1).unwrap();
    let theirs = second.events(1).unwrap();

    let err = ours.concat(&theirs).unwrap_err();
    assert!(matches!(err, CollectionError::ContextMismatch { .. }));

    let joined = ours.concat(&first.events(2).unwrap()).unwrap();
    assert_eq!(joined.len(), ours.len() + first.events(2).unwrap().len());
}

#[test]
fn test_queries_chain_without_touching_the_source() {
    let report = open_dsu(fixture_source());
    let events = report.events(1).unwrap();

    let casts = events.casts(&["Reprisal".into()]);
    assert_eq!(casts.len(), 1);
    assert_eq!(casts.first().unwrap().source, 6);

    let on_players = events.to_players().of_kind(EventKind::Damage);
    assert_eq!(on_players.len(), 1);

    let window = events.between(100, 300).unwrap();
    assert_eq!(window.len(), 3);
    assert!(matches!(
        events.between(300, 100),
        Err(CollectionError::InvalidWindow { .. })
    ));

    // The original collection is unchanged
    assert_eq!(events.len(), 9);
    assert!(events.by(&["Nobody"]).is_empty());
}

#[test]
fn test_whole_report_and_ordering_queries() {
    let report = open_dsu(fixture_source());

    let all = report.all_events().unwrap();
    assert_eq!(all.len(), 9 + 7 + 6);
    assert_eq!(all.first().unwrap().fight, 1);
    assert_eq!(all.last().unwrap().fight, 3);

    let newest_first = all.sort_by_time(true);
    assert_eq!(newest_first.first().unwrap().time, 150_000);

    // Fight 3 cast is in P4, fight 2 cast in P2
    let casts = all.of_kind(EventKind::Cast).sort_by_phase().unwrap();
    let phases: Vec<_> = casts
        .iter()
        .map(|e| report.phase(e).unwrap().unwrap())
        .collect();
    assert_eq!(phases, vec![0, 1, 3]);

    let cut = all.slice(0..2).unwrap();
    assert_eq!(cut.len(), 2);
    assert!(matches!(
        all.slice(20..30),
        Err(CollectionError::OutOfRange { .. })
    ));

    let pivot = all.get(4).unwrap().clone();
    assert!(all.before(&pivot).iter().all(|e| e.time <= pivot.time));
    assert!(all.after(&pivot).iter().all(|e| e.time >= pivot.time));
}

#[test]
fn test_collected_events_carry_their_report() {
    let source = fixture_source();
    let first = open_dsu(Arc::clone(&source));
    let second = open_dsu(source);

    let markers = first.collect(vec![at(10, 1), at(20, 1)]);
    assert_eq!(markers.len(), 2);
    assert!(markers.concat(&first.events(1).unwrap()).is_ok());
    assert!(markers.concat(&second.collect(vec![at(30, 1)])).is_err());
}

#[test]
fn test_named_projection() {
    let report = open_dsu(fixture_source());
    let named = report
        .events(1)
        .unwrap()
        .of_kind(EventKind::Damage)
        .named();

    assert_eq!(named.len(), 1);
    assert_eq!(named[0].source, "Ser Adelphel");
    assert_eq!(named[0].target, "Aymeric");
    assert_eq!(named[0].ability.as_deref(), Some("Holiest of Holy"));
    assert_eq!(named[0].fight_time, 4_000);
}

#[test]
fn test_actor_and_fight_filters() {
    let report = open_dsu(fixture_source());
    let events = report.events(1).unwrap();

    let on_adelphel = events.to(&["Ser Adelphel"]);
    assert_eq!(on_adelphel.len(), 3);
    assert!(on_adelphel.iter().all(|e| e.target == 30));
    assert_eq!(on_adelphel.len(), events.to_npcs().len());

    let from_npcs = events.by_npcs();
    assert_eq!(from_npcs.len(), 1);
    assert_eq!(from_npcs.first().unwrap().kind, EventKind::Damage);
    assert_eq!(events.by_players().len(), 8);

    let all = report.all_events().unwrap();
    let later = all.in_fights(&[2, 3]);
    assert_eq!(
        later.len(),
        report.events(2).unwrap().len() + report.events(3).unwrap().len()
    );
    assert!(later.iter().all(|e| e.fight != 1));
    assert!(all.in_fights(&[4, 99]).is_empty());
}

#[test]
fn test_name_filters_on_empty_collection() {
    let report = open_dsu(fixture_source());
    let empty = report.events(99).unwrap();

    assert!(empty.by(&["Aymeric"]).is_empty());
    assert!(empty.to(&["Ser Adelphel"]).is_empty());
    assert!(empty.by_players().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Phases
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_wipe_in_first_phase() {
    let report = open_dsu(fixture_source());
    let timeline = report.timeline(1).unwrap().unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.checkpoints()[0].time, 0);

    for event in &report.events(1).unwrap() {
        assert_eq!(report.phase(event).unwrap(), Some(0));
        assert_eq!(report.phase_name(event).unwrap(), Some("P1"));
    }
}

#[test]
fn test_pull_from_door_phase() {
    let report = open_dsu(fixture_source());
    let timeline = report.timeline(2).unwrap().unwrap();
    let times: Vec<_> = timeline.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![30_000, 60_000]);

    let cast = at(70_000, 2);
    assert_eq!(report.phase_name(&cast).unwrap(), Some("P2"));
    assert_eq!(report.phase_relative_time(&cast).unwrap(), Some(10_000));
    assert_eq!(report.phase_start(&cast).unwrap().unwrap().target, 33);
}

#[test]
fn test_pull_assumed_in_p2() {
    let report = open_dsu(fixture_source());
    let times: Vec<_> = report
        .timeline(3)
        .unwrap()
        .unwrap()
        .iter()
        .map(|e| e.time)
        .collect();
    assert_eq!(times, vec![-1, 100_000, 103_000, 105_000]);
    assert_eq!(report.phase_name(&at(150_000, 3)).unwrap(), Some("P4"));
}

#[test]
fn test_phase_monotonic_over_fight_events() {
    let report = open_dsu(fixture_source());
    for fight in report.fights() {
        let events = report.events(fight.id).unwrap().sort_by_time(false);
        let mut last = 0;
        for event in &events {
            let phase = report.phase(event).unwrap().unwrap();
            assert!(phase >= last, "phase went backwards in fight {}", fight.id);
            assert!(report.phase_relative_time(event).unwrap().unwrap() >= 0);
            last = phase;
        }
    }
}

#[test]
fn test_phase_starts_across_fights() {
    let report = open_dsu(fixture_source());
    let starts = report.phase_starts(&["P2", "P3"]).unwrap();

    let found: Vec<_> = starts.iter().map(|e| (e.fight, e.time)).collect();
    assert_eq!(found, vec![(2, 60_000), (3, 100_000), (3, 103_000)]);

    assert!(matches!(
        report.phase_starts(&["P9"]),
        Err(ReportError::Phase(PhaseError::UnknownPhase { .. }))
    ));
}

#[test]
fn test_phase_starts_keep_names_on_shared_timestamps() {
    // Positions 2 and 4 of the checkpoint stream land on the same millisecond
    let json = r#"{
        "code": "shared",
        "masterData": {
            "actors": [{"id": 5, "gameID": 0, "name": "Aymeric", "type": "Player"},
                       {"id": 30, "gameID": 12601, "name": "Ser Adelphel", "type": "NPC"},
                       {"id": 33, "gameID": 12604, "name": "King Thordan", "type": "NPC"}]
        },
        "fights": [{"id": 7, "encounterID": 1065, "startTime": 100000, "endTime": 200000,
                    "fightPercentage": 30.0, "lastPhaseAsAbsoluteIndex": 3, "friendlyPlayers": [5]}],
        "events": [
            {"timestamp": 101000, "type": "targetabilityupdate", "sourceID": 33, "targetID": 33, "fight": 7, "targetable": 1},
            {"timestamp": 102000, "type": "targetabilityupdate", "sourceID": 30, "targetID": 30, "fight": 7, "targetable": 1},
            {"timestamp": 103000, "type": "targetabilityupdate", "sourceID": 33, "targetID": 33, "fight": 7, "targetable": 1},
            {"timestamp": 103000, "type": "targetabilityupdate", "sourceID": 30, "targetID": 30, "fight": 7, "targetable": 1},
            {"timestamp": 103000, "type": "targetabilityupdate", "sourceID": 33, "targetID": 33, "fight": 7, "targetable": 1}
        ]
    }"#;
    let source = Arc::new(MemorySource::from_json_str(json).unwrap());
    let report = open_dsu(source);

    let starts = report.labelled_phase_starts(&["P3", "P4"]).unwrap();
    let found: Vec<_> = starts.iter().map(|(name, e)| (*name, e.time)).collect();
    assert_eq!(found, vec![("P3", 103_000), ("P4", 103_000)]);

    // Classifying by time alone puts both starts in the later phase
    assert_eq!(report.phase_name(&starts[0].1).unwrap(), Some("P4"));
    assert_eq!(report.phase_starts(&["P3", "P4"]).unwrap().len(), 2);
}

#[test]
fn test_in_phases_orders_by_phase_time() {
    let report = open_dsu(fixture_source());
    let p2 = report.events(2).unwrap().in_phases(&["P2"]).unwrap();

    let times: Vec<_> = p2.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![60_000, 70_000]);
    assert!(report.events(2).unwrap().in_phases(&["P0"]).is_err());
}

#[test]
fn test_timeline_cached_and_rebuilds_identically() {
    let source = fixture_source();
    let first = open_dsu(Arc::clone(&source));
    let second = open_dsu(source);

    let a = first.timeline(3).unwrap().unwrap();
    let b = first.timeline(3).unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(*a, *second.timeline(3).unwrap().unwrap());

    let index = first.aura_index(1).unwrap().unwrap();
    assert_eq!(*index, *second.aura_index(1).unwrap().unwrap());
}

// ═══════════════════════════════════════════════════════════════════════════
// Auras
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_flickering_buff() {
    let report = open_dsu(fixture_source());

    let before = report.active_at(&at(250, 1)).unwrap();
    assert_eq!(before.get(&5), Some(&vec![MEDICATED]));

    let after = report.active_at(&at(350, 1)).unwrap();
    assert_eq!(after.get(&5), Some(&vec![MEDICATED, RAMPART]));

    let applied = report.applied_at(&at(350, 1)).unwrap();
    let rampart = applied
        .iter()
        .find(|e| e.ability_id() == Some(RAMPART))
        .unwrap();
    assert_eq!(rampart.time, 300);
}

#[test]
fn test_prepull_buff_lasts_until_removed() {
    let report = open_dsu(fixture_source());
    let active = report.active_at(&at(5_000, 1)).unwrap();

    let expected = BTreeMap::from([(5, vec![MEDICATED, RAMPART]), (30, vec![REPRISAL_DEBUFF])]);
    assert_eq!(active, expected);

    let applied = report.applied_at(&at(5_000, 1)).unwrap();
    assert!(applied.iter().all(|e| e.kind.is_apply()));
    assert_eq!(applied.first().unwrap().duration(), Some(20_000));

    // Reprisal comes off at 11s
    let later = report.active_at(&at(12_000, 1)).unwrap();
    assert!(!later.contains_key(&30));
}

#[test]
fn test_active_targets_were_seen_in_aura_events() {
    let report = open_dsu(fixture_source());
    let observed = [5, 30];
    for time in [0, 150, 350, 1_000, 5_000, 19_000] {
        let active = report.active_at(&at(time, 1)).unwrap();
        assert!(active.keys().all(|k| observed.contains(k)));
    }
}

#[test]
fn test_named_active_auras() {
    let report = open_dsu(fixture_source());
    let named = report.active_at_named(&at(5_000, 1)).unwrap();

    assert_eq!(
        named.get("Aymeric"),
        Some(&vec!["Medicated".to_string(), "Rampart".to_string()])
    );
    assert_eq!(named.get("Ser Adelphel"), Some(&vec!["Reprisal".to_string()]));
}

#[test]
fn test_whole_fight_aura_queries() {
    let report = open_dsu(fixture_source());

    let rampart = report.aura(&[AbilitySelector::Id(RAMPART)], 1).unwrap();
    let times: Vec<_> = rampart.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![100, 300]);

    // By name: both Reprisal ids, apply events only
    let reprisal = report.aura(&["Reprisal".into()], 1).unwrap();
    assert_eq!(reprisal.len(), 1);

    assert_eq!(report.aura_on("Reprisal", 1).unwrap(), vec!["Ser Adelphel"]);
    assert!(report.aura(&[], 1).unwrap().is_empty());
    assert!(report.aura_on("Nonexistent", 1).unwrap().is_empty());
}
