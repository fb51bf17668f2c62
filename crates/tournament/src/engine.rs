//! Bracket advancement engine.
//!
//! Resolving a battle moves it from pending (no winner) to resolved (winner
//! set, permanent). A resolution is triggered either by naming one of the two
//! contenders as winner, or, for a shark fight between equal scores, by
//! leaving the winner out and letting the coin decide.
//!
//! Once the winner is known the engine:
//! 1. writes the winner into the parent battle's slot (unless this is the final)
//! 2. names the winner's entity champion and marks the tournament `COMPLETED`
//!    (every resolution or final only, see [`CompletionPolicy`](crate::CompletionPolicy))
//! 3. eliminates the loser and pays the winner the advancement bonus
//!
//! All of it happens inside one store transaction.

use bracket_core::*;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::coin::TieBreaker;
use crate::config::ScoringConfig;
use crate::ledger::ScoreLedger;
use crate::store::BracketStore;

/// Outcome of a battle, before anything is written
struct Decision {
    winner: Participant,
    loser: Participant,
    tie_break: bool,
}

pub struct AdvancementEngine<C: TieBreaker> {
    config: ScoringConfig,
    ledger: ScoreLedger,
    coin: C,
}

impl<C: TieBreaker> AdvancementEngine<C> {
    pub fn new(config: ScoringConfig, coin: C) -> Self {
        Self {
            ledger: ScoreLedger::new(&config),
            config,
            coin,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// Resolve a battle, propagating the winner up the bracket.
    ///
    /// Without a `winner` the battle is only resolved if it is a shark fight;
    /// otherwise it is returned untouched. On error nothing is written.
    pub fn resolve_battle<S: BracketStore>(
        &mut self,
        store: &mut S,
        battle_id: BattleId,
        winner: Option<ParticipantId>,
    ) -> Result<Battle> {
        let result = store.transaction(|tx| self.resolve_within(tx, battle_id, winner));
        if let Err(e) = &result {
            warn!(battle = %battle_id, error = %e, "resolution rejected");
        }
        result
    }

    fn resolve_within<S: BracketStore>(
        &mut self,
        store: &mut S,
        battle_id: BattleId,
        winner: Option<ParticipantId>,
    ) -> Result<Battle> {
        let mut battle = store.battle(battle_id)?;

        if let Some(existing) = battle.winner {
            return Err(BracketError::invalid_state(format!(
                "battle {} was already won by participant {}",
                battle.id, existing
            )));
        }

        let Some(decision) = self.decide(store, &battle, winner)? else {
            debug!(battle = %battle.id, "no winner to advance");
            return Ok(battle);
        };

        if decision.winner.eliminated {
            return Err(BracketError::invalid_state(format!(
                "participant {} is already eliminated and cannot win battle {}",
                decision.winner.id, battle.id
            )));
        }

        let participant_count = store.count_participants(battle.tournament)?;
        let total = total_battles(participant_count)?;
        if !contains_battle(battle.battle_number, total) {
            return Err(BracketError::invalid_state(format!(
                "battle #{} is outside a bracket of {} battles",
                battle.battle_number, total
            )));
        }
        let is_final = is_final_battle(battle.battle_number, total);

        if decision.tie_break {
            self.ledger.apply_tie_break_bonus(store, decision.winner.id)?;
        }

        battle.winner = Some(decision.winner.id);
        battle.completed = true;
        let battle = store.save_battle(battle)?;
        info!(
            battle = %battle.id,
            number = battle.battle_number,
            winner = %decision.winner.id,
            loser = %decision.loser.id,
            tie_break = decision.tie_break,
            "battle resolved"
        );

        if !is_final {
            self.advance(store, &battle, total, decision.winner.id)?;
        }

        if self.config.completes_tournament(is_final) {
            let mut tournament = store.tournament(battle.tournament)?;
            tournament.champion = Some(decision.winner.entity);
            tournament.status = TournamentStatus::Completed;
            store.save_tournament(tournament)?;
            info!(
                tournament = %battle.tournament,
                champion = %decision.winner.entity,
                is_final,
                "champion recorded"
            );
        }

        self.ledger.mark_eliminated(store, decision.loser.id)?;
        if self.config.pays_advancement_bonus(is_final) {
            self.ledger
                .apply_advancement_bonus(store, decision.winner.id)?;
        }

        Ok(battle)
    }

    /// Work out who won, if anyone. Reads only.
    fn decide<S: BracketStore>(
        &mut self,
        store: &S,
        battle: &Battle,
        winner: Option<ParticipantId>,
    ) -> Result<Option<Decision>> {
        let Some((first, second)) = battle.contenders() else {
            return match winner {
                Some(_) => Err(BracketError::invalid_state(format!(
                    "battle {} needs both slots filled before it can be won",
                    battle.id
                ))),
                None => Ok(None),
            };
        };

        match winner {
            Some(winner) => {
                let slot = battle.slot_of(winner).ok_or_else(|| {
                    BracketError::invalid_input(format!(
                        "participant {} is not fighting in battle {}",
                        winner, battle.id
                    ))
                })?;
                let loser = if slot == Slot::First { second } else { first };
                Ok(Some(Decision {
                    winner: store.participant(winner)?,
                    loser: store.participant(loser)?,
                    tie_break: false,
                }))
            }
            None if battle.shark_fight => {
                let first = store.participant(first)?;
                let second = store.participant(second)?;
                if first.score() != second.score() {
                    return Err(BracketError::invalid_state(format!(
                        "shark fight expected in battle {} but scores differ ({} vs {})",
                        battle.id,
                        first.score(),
                        second.score()
                    )));
                }
                let (winner, loser) = match self.coin.draw() {
                    Slot::First => (first, second),
                    Slot::Second => (second, first),
                };
                Ok(Some(Decision {
                    winner,
                    loser,
                    tie_break: true,
                }))
            }
            None => Ok(None),
        }
    }

    fn advance<S: BracketStore>(
        &self,
        store: &mut S,
        battle: &Battle,
        total: u32,
        winner: ParticipantId,
    ) -> Result<()> {
        let parent_number = parent_battle_number(battle.battle_number, total);
        let slot = parent_slot(battle.battle_number);

        let mut parent = store
            .find_battle_by_number(parent_number, battle.tournament)?
            .ok_or_else(|| {
                BracketError::not_found(
                    "parent battle",
                    format!("#{} of tournament {}", parent_number, battle.tournament),
                )
            })?;

        if parent.is_resolved() {
            return Err(BracketError::invalid_state(format!(
                "parent battle #{} is already resolved",
                parent_number
            )));
        }
        if let Some(occupant) = parent.slot(slot).filter(|&p| p != winner) {
            return Err(BracketError::invalid_state(format!(
                "{} of battle #{} is already held by participant {}",
                slot, parent_number, occupant
            )));
        }

        parent.set_slot(slot, winner);
        store.save_battle(parent)?;
        info!(
            from = battle.battle_number,
            to = parent_number,
            %slot,
            participant = %winner,
            "winner advanced"
        );
        Ok(())
    }

    /// Record that something happened to a participant during a battle and
    /// apply its score modifier. This is the only place an event moves a score.
    pub fn record_event<S: BracketStore>(
        &self,
        store: &mut S,
        battle: BattleId,
        participant: ParticipantId,
        event_type: EventTypeId,
    ) -> Result<EventId> {
        store.transaction(|tx| {
            let (battle, participant, event_type) =
                load_event_refs(tx, battle, participant, event_type)?;

            let event = tx.create_battle_event(BattleEvent {
                id: EventId(0),
                battle: battle.id,
                participant: participant.id,
                event_type: event_type.id,
                recorded_at: unix_now(),
            })?;
            self.ledger.apply_event(tx, participant.id, &event_type)?;

            info!(
                event = %event.id,
                battle = %battle.id,
                participant = %participant.id,
                kind = %event_type.name,
                modifier = event_type.score_modifier,
                "event recorded"
            );
            Ok(event.id)
        })
    }

    /// Re-point an existing event record. Scores are left alone.
    pub fn update_event<S: BracketStore>(
        &self,
        store: &mut S,
        event: EventId,
        battle: BattleId,
        participant: ParticipantId,
        event_type: EventTypeId,
    ) -> Result<BattleEvent> {
        store.transaction(|tx| {
            let mut record = tx.battle_event(event)?;
            let (battle, participant, event_type) =
                load_event_refs(tx, battle, participant, event_type)?;
            record.battle = battle.id;
            record.participant = participant.id;
            record.event_type = event_type.id;
            debug!(event = %record.id, "event updated");
            tx.save_battle_event(record)
        })
    }
}

fn load_event_refs<S: BracketStore>(
    store: &S,
    battle: BattleId,
    participant: ParticipantId,
    event_type: EventTypeId,
) -> Result<(Battle, Participant, EventType)> {
    let battle = store.battle(battle)?;
    let participant = store.participant(participant)?;
    let event_type = store.event_type(event_type)?;
    if participant.tournament != battle.tournament {
        return Err(BracketError::invalid_input(format!(
            "participant {} is not entered in tournament {}",
            participant.id, battle.tournament
        )));
    }
    Ok((battle, participant, event_type))
}

/// Seconds since the Unix epoch
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
