use super::*;
use crate::coin::FixedCoin;
use crate::config::{BonusScope, CompletionPolicy};
use crate::seeding::{seed_bracket, SeededBracket};
use crate::store::InMemoryStore;

fn bracket(size: u64, shark_fights: &[u32]) -> (InMemoryStore, SeededBracket) {
    let mut store = InMemoryStore::new();
    let entities: Vec<_> = (101..101 + size).map(EntityId).collect();
    let seeded = seed_bracket(
        &mut store,
        &ScoringConfig::default(),
        "Engine test",
        &entities,
        shark_fights,
    )
    .unwrap();
    (store, seeded)
}

fn engine(slot: Slot) -> AdvancementEngine<FixedCoin> {
    AdvancementEngine::new(ScoringConfig::default(), FixedCoin(slot))
}

fn battle_id(seeded: &SeededBracket, number: u32) -> BattleId {
    seeded.battle(number).unwrap().id
}

fn score(store: &InMemoryStore, id: ParticipantId) -> i32 {
    store.participant(id).unwrap().score()
}

fn event_type(store: &mut InMemoryStore, name: &str, modifier: i32) -> EventTypeId {
    store
        .create_event_type(EventType {
            id: EventTypeId(0),
            name: name.into(),
            score_modifier: modifier,
        })
        .unwrap()
        .id
}

#[test]
fn test_winner_advances_to_first_slot_of_parent() {
    let (mut store, seeded) = bracket(8, &[]);
    let mut engine = engine(Slot::First);
    let winner = seeded.participants[0].id;
    let loser = seeded.participants[1].id;

    let battle = engine
        .resolve_battle(&mut store, battle_id(&seeded, 1), Some(winner))
        .unwrap();

    assert_eq!(battle.winner, Some(winner));
    assert!(battle.completed);

    let parent = store.battle(battle_id(&seeded, 5)).unwrap();
    assert_eq!(parent.slot1, Some(winner));
    assert_eq!(parent.slot2, None);

    assert_eq!(score(&store, winner), 100);
    assert_eq!(score(&store, loser), 70);
    assert!(store.participant(loser).unwrap().eliminated);
    assert!(!store.participant(winner).unwrap().eliminated);
}

#[test]
fn test_even_battle_fills_second_slot() {
    let (mut store, seeded) = bracket(8, &[]);
    let mut engine = engine(Slot::First);
    let winner = seeded.participants[3].id;

    engine
        .resolve_battle(&mut store, battle_id(&seeded, 2), Some(winner))
        .unwrap();

    let parent = store.battle(battle_id(&seeded, 5)).unwrap();
    assert_eq!(parent.slot1, None);
    assert_eq!(parent.slot2, Some(winner));
}

#[test]
fn test_stranger_as_winner_is_invalid_input_and_changes_nothing() {
    let (mut store, seeded) = bracket(8, &[]);
    let mut engine = engine(Slot::First);
    let stranger = seeded.participants[5].id;

    let before_bracket = store.bracket(seeded.tournament.id).unwrap();
    let before_standings = store.standings(seeded.tournament.id).unwrap();

    let err = engine
        .resolve_battle(&mut store, battle_id(&seeded, 1), Some(stranger))
        .unwrap_err();

    assert!(matches!(err, BracketError::InvalidInput(_)));
    assert_eq!(store.bracket(seeded.tournament.id).unwrap(), before_bracket);
    assert_eq!(
        store.standings(seeded.tournament.id).unwrap(),
        before_standings
    );
    assert_eq!(
        store.tournament(seeded.tournament.id).unwrap(),
        seeded.tournament
    );
}

#[test]
fn test_shark_fight_draw_picks_either_slot() {
    for (slot, winner_index) in [(Slot::First, 0), (Slot::Second, 1)] {
        let (mut store, seeded) = bracket(8, &[1]);
        let mut engine = engine(slot);
        let winner = seeded.participants[winner_index].id;
        let loser = seeded.participants[1 - winner_index].id;

        let battle = engine
            .resolve_battle(&mut store, battle_id(&seeded, 1), None)
            .unwrap();

        assert_eq!(battle.winner, Some(winner));
        // tie-break bonus plus advancement bonus
        assert_eq!(score(&store, winner), 70 + 2 + 30);
        assert_eq!(score(&store, loser), 70);
        assert!(store.participant(loser).unwrap().eliminated);

        let parent = store.battle(battle_id(&seeded, 5)).unwrap();
        assert_eq!(parent.slot1, Some(winner));
    }
}

#[test]
fn test_shark_fight_with_unequal_scores_is_rejected() {
    let (mut store, seeded) = bracket(8, &[1]);
    let mut engine = engine(Slot::First);
    let boost = event_type(&mut store, "strong pitch", 5);
    let p0 = seeded.participants[0].id;

    engine
        .record_event(&mut store, battle_id(&seeded, 1), p0, boost)
        .unwrap();

    let err = engine
        .resolve_battle(&mut store, battle_id(&seeded, 1), None)
        .unwrap_err();
    assert!(matches!(err, BracketError::InvalidState(_)));

    let battle = store.battle(battle_id(&seeded, 1)).unwrap();
    assert_eq!(battle.winner, None);
    assert_eq!(score(&store, p0), 75);
}

#[test]
fn test_shark_fight_with_explicit_winner_skips_draw() {
    let (mut store, seeded) = bracket(4, &[1]);
    let mut engine = engine(Slot::First);
    let winner = seeded.participants[1].id;

    engine
        .resolve_battle(&mut store, battle_id(&seeded, 1), Some(winner))
        .unwrap();

    assert_eq!(score(&store, winner), 100);
}

#[test]
fn test_no_winner_and_no_shark_fight_is_a_no_op() {
    let (mut store, seeded) = bracket(8, &[]);
    let mut engine = engine(Slot::First);
    let before = store.bracket(seeded.tournament.id).unwrap();

    let battle = engine
        .resolve_battle(&mut store, battle_id(&seeded, 1), None)
        .unwrap();

    assert_eq!(battle.winner, None);
    assert!(!battle.completed);
    assert_eq!(store.bracket(seeded.tournament.id).unwrap(), before);
    assert_eq!(
        store.tournament(seeded.tournament.id).unwrap().status,
        TournamentStatus::Active
    );
}

#[test]
fn test_winner_is_permanent() {
    let (mut store, seeded) = bracket(8, &[]);
    let mut engine = engine(Slot::First);
    let b1 = battle_id(&seeded, 1);

    engine
        .resolve_battle(&mut store, b1, Some(seeded.participants[0].id))
        .unwrap();
    let err = engine
        .resolve_battle(&mut store, b1, Some(seeded.participants[1].id))
        .unwrap_err();

    assert!(matches!(err, BracketError::InvalidState(_)));
    assert_eq!(
        store.battle(b1).unwrap().winner,
        Some(seeded.participants[0].id)
    );
}

#[test]
fn test_battle_with_empty_slot_cannot_be_won() {
    let (mut store, seeded) = bracket(8, &[5]);
    let mut engine = engine(Slot::First);
    let b5 = battle_id(&seeded, 5);

    engine
        .resolve_battle(&mut store, battle_id(&seeded, 1), Some(seeded.participants[0].id))
        .unwrap();

    let err = engine
        .resolve_battle(&mut store, b5, Some(seeded.participants[0].id))
        .unwrap_err();
    assert!(matches!(err, BracketError::InvalidState(_)));

    // Nothing to draw between yet
    let battle = engine.resolve_battle(&mut store, b5, None).unwrap();
    assert_eq!(battle.winner, None);
}

#[test]
fn test_eliminated_participant_cannot_win() {
    let (mut store, seeded) = bracket(4, &[]);
    let mut engine = engine(Slot::First);
    let p0 = seeded.participants[0].id;
    engine.ledger().mark_eliminated(&mut store, p0).unwrap();

    let err = engine
        .resolve_battle(&mut store, battle_id(&seeded, 1), Some(p0))
        .unwrap_err();
    assert!(matches!(err, BracketError::InvalidState(_)));
}

#[test]
fn test_unknown_battle_is_not_found() {
    let (mut store, _) = bracket(4, &[]);
    let mut engine = engine(Slot::First);

    let err = engine
        .resolve_battle(&mut store, BattleId(9999), None)
        .unwrap_err();
    assert_eq!(err, BracketError::not_found("battle", 9999));
}

#[test]
fn test_missing_parent_rolls_back_everything() {
    let mut store = InMemoryStore::new();
    let tournament = store
        .create_tournament(Tournament {
            id: TournamentId(0),
            name: "Broken".into(),
            status: TournamentStatus::Active,
            champion: None,
        })
        .unwrap();
    let players: Vec<_> = (0..4)
        .map(|i| {
            store
                .create_participant(Participant {
                    id: ParticipantId(0),
                    tournament: tournament.id,
                    entity: EntityId(i),
                    current_score: Some(70),
                    eliminated: false,
                })
                .unwrap()
        })
        .collect();
    // Battle 3 (the final) was never created
    let b1 = store
        .create_battle(Battle {
            id: BattleId(0),
            tournament: tournament.id,
            battle_number: 1,
            round_number: 1,
            slot1: Some(players[0].id),
            slot2: Some(players[1].id),
            winner: None,
            shark_fight: true,
            completed: false,
        })
        .unwrap();

    let mut engine = engine(Slot::First);
    let err = engine.resolve_battle(&mut store, b1.id, None).unwrap_err();

    assert!(matches!(err, BracketError::NotFound { kind: "parent battle", .. }));
    assert_eq!(store.battle(b1.id).unwrap(), b1);
    assert_eq!(score(&store, players[0].id), 70);
    assert!(!store.participant(players[1].id).unwrap().eliminated);
    assert_eq!(store.tournament(tournament.id).unwrap(), tournament);
}

#[test]
fn test_literal_policy_names_champion_every_resolution() {
    let (mut store, seeded) = bracket(8, &[]);
    let mut engine = engine(Slot::First);

    engine
        .resolve_battle(&mut store, battle_id(&seeded, 2), Some(seeded.participants[2].id))
        .unwrap();

    let tournament = store.tournament(seeded.tournament.id).unwrap();
    assert_eq!(tournament.status, TournamentStatus::Completed);
    assert_eq!(tournament.champion, Some(seeded.participants[2].entity));
}

#[test]
fn test_final_only_policy_waits_for_the_final() {
    let (mut store, seeded) = bracket(4, &[]);
    let config = ScoringConfig {
        completion: CompletionPolicy::FinalOnly,
        advancement_bonus_scope: BonusScope::FinalOnly,
        ..Default::default()
    };
    let mut engine = AdvancementEngine::new(config, FixedCoin(Slot::First));
    let p = &seeded.participants;

    engine
        .resolve_battle(&mut store, battle_id(&seeded, 1), Some(p[0].id))
        .unwrap();
    engine
        .resolve_battle(&mut store, battle_id(&seeded, 2), Some(p[3].id))
        .unwrap();

    let tournament = store.tournament(seeded.tournament.id).unwrap();
    assert_eq!(tournament.status, TournamentStatus::Active);
    assert_eq!(tournament.champion, None);
    assert_eq!(score(&store, p[0].id), 70);

    let final_battle = store.battle(battle_id(&seeded, 3)).unwrap();
    assert_eq!(final_battle.contenders(), Some((p[0].id, p[3].id)));

    engine
        .resolve_battle(&mut store, final_battle.id, Some(p[3].id))
        .unwrap();

    let tournament = store.tournament(seeded.tournament.id).unwrap();
    assert_eq!(tournament.status, TournamentStatus::Completed);
    assert_eq!(tournament.champion, Some(p[3].entity));
    assert_eq!(score(&store, p[3].id), 100);
    assert!(store.participant(p[0].id).unwrap().eliminated);
}

#[test]
fn test_final_does_not_touch_other_battles() {
    let (mut store, seeded) = bracket(2, &[]);
    let mut engine = engine(Slot::First);
    let p = &seeded.participants;

    engine
        .resolve_battle(&mut store, battle_id(&seeded, 1), Some(p[1].id))
        .unwrap();

    let tournament = store.tournament(seeded.tournament.id).unwrap();
    assert_eq!(tournament.status, TournamentStatus::Completed);
    assert_eq!(tournament.champion, Some(p[1].entity));
    assert_eq!(store.bracket(seeded.tournament.id).unwrap().len(), 1);
}

#[test]
fn test_events_apply_once() {
    let (mut store, seeded) = bracket(4, &[]);
    let engine = engine(Slot::First);
    let p0 = seeded.participants[0].id;
    let b1 = battle_id(&seeded, 1);
    let plus = event_type(&mut store, "traction", 5);
    let minus = event_type(&mut store, "bug in demo", -3);

    let first = engine.record_event(&mut store, b1, p0, plus).unwrap();
    engine.record_event(&mut store, b1, p0, minus).unwrap();
    assert_eq!(score(&store, p0), 72);

    let fetched = store.battle_event(first).unwrap();
    let updated = engine
        .update_event(&mut store, fetched.id, b1, p0, minus)
        .unwrap();
    assert_eq!(updated.event_type, minus);
    assert_eq!(score(&store, p0), 72);

    assert_eq!(store.events_for(b1, p0).unwrap().len(), 2);
    assert_eq!(store.events_for_participant(p0).unwrap().len(), 2);
    assert!(store
        .events_for_participant(seeded.participants[1].id)
        .unwrap()
        .is_empty());
}

#[test]
fn test_event_with_unknown_type_writes_nothing() {
    let (mut store, seeded) = bracket(4, &[]);
    let engine = engine(Slot::First);
    let p0 = seeded.participants[0].id;

    let err = engine
        .record_event(&mut store, battle_id(&seeded, 1), p0, EventTypeId(777))
        .unwrap_err();

    assert!(matches!(err, BracketError::NotFound { .. }));
    assert!(store.events_for_participant(p0).unwrap().is_empty());
    assert_eq!(score(&store, p0), 70);
}

#[test]
fn test_event_for_participant_of_other_tournament() {
    let (mut store, seeded) = bracket(4, &[]);
    let other = seed_bracket(
        &mut store,
        &ScoringConfig::default(),
        "Other",
        &[EntityId(1), EntityId(2)],
        &[],
    )
    .unwrap();
    let engine = engine(Slot::First);
    let kind = event_type(&mut store, "pitch", 1);

    let err = engine
        .record_event(
            &mut store,
            battle_id(&seeded, 1),
            other.participants[0].id,
            kind,
        )
        .unwrap_err();
    assert!(matches!(err, BracketError::InvalidInput(_)));
}
