use super::*;
use crate::coin::FixedCoin;
use crate::config::ScoringConfig;
use crate::engine::AdvancementEngine;
use crate::seeding::seed_bracket;
use crate::store::InMemoryStore;

fn played_report() -> TournamentReport {
    let mut store = InMemoryStore::new();
    let seeded = seed_bracket(
        &mut store,
        &ScoringConfig::default(),
        "Report cup",
        &[EntityId(1), EntityId(2), EntityId(3), EntityId(4)],
        &[],
    )
    .unwrap();
    let mut engine = AdvancementEngine::new(ScoringConfig::default(), FixedCoin(Slot::First));
    let p = &seeded.participants;
    engine
        .resolve_battle(&mut store, seeded.battles[0].id, Some(p[1].id))
        .unwrap();

    TournamentReport::from_store(&store, seeded.tournament.id).unwrap()
}

#[test]
fn test_report_from_store() {
    let report = played_report();

    assert_eq!(report.battles.len(), 3);
    assert_eq!(report.standings.len(), 4);
    assert_eq!(report.standings[0].entity, EntityId(2));
    assert_eq!(report.standings[0].score, 100);
    assert!(report.standings.iter().any(|s| s.eliminated));
}

#[test]
fn test_text_report_lists_bracket_and_standings() {
    let text = played_report().generate_report();

    assert!(text.contains("=== Tournament: Report cup ==="));
    assert!(text.contains("Status: COMPLETED"));
    assert!(text.contains("Champion: #2"));
    assert!(text.contains("Standings:"));
}

#[test]
fn test_save_and_load() {
    let report = played_report();
    let path = std::env::temp_dir().join(format!("bracket_report_{}.json", std::process::id()));

    report.save(&path).unwrap();
    let loaded = TournamentReport::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, report);
}

#[test]
fn test_load_missing_file() {
    let err = TournamentReport::load(Path::new("no/such/report.json")).unwrap_err();
    assert!(matches!(err, BracketError::Storage(_)));
}
