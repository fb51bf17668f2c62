//! Bracket creation.
//!
//! Seeding lays out every battle of the bracket up front, numbered round by
//! round, and fills round one pairwise in entry order: entries 0 and 1 meet in
//! battle 1, entries 2 and 3 in battle 2, and so on. Later rounds start empty
//! and are filled by advancement.

use bracket_core::*;
use std::collections::HashSet;
use tracing::info;

use crate::config::ScoringConfig;
use crate::store::BracketStore;

/// Everything created for a new tournament
#[derive(Debug, Clone)]
pub struct SeededBracket {
    pub tournament: Tournament,
    /// In entry order
    pub participants: Vec<Participant>,
    /// In battle-number order
    pub battles: Vec<Battle>,
}

impl SeededBracket {
    pub fn battle(&self, battle_number: u32) -> Option<&Battle> {
        self.battles
            .iter()
            .find(|b| b.battle_number == battle_number)
    }
}

/// Create an `ACTIVE` tournament with one participant per entity and all of
/// its battles. Battles whose numbers appear in `shark_fights` are flagged as
/// tie-break eligible.
pub fn seed_bracket<S: BracketStore>(
    store: &mut S,
    config: &ScoringConfig,
    name: &str,
    entities: &[EntityId],
    shark_fights: &[u32],
) -> Result<SeededBracket> {
    let count = u32::try_from(entities.len())
        .map_err(|_| BracketError::invalid_input("too many entrants"))?;
    if !is_valid_bracket_size(count) {
        return Err(BracketError::invalid_state(format!(
            "a single-elimination bracket needs a power of two entrants (at least 2), found {}",
            count
        )));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = entities.iter().find(|e| !seen.insert(**e)) {
        return Err(BracketError::invalid_input(format!(
            "entity {} is entered more than once",
            dup
        )));
    }

    let total = total_battles(count)?;
    if let Some(bad) = shark_fights.iter().find(|&&n| !contains_battle(n, total)) {
        return Err(BracketError::invalid_input(format!(
            "shark fight #{} is outside a bracket of {} battles",
            bad, total
        )));
    }

    store.transaction(|tx| {
        let tournament = tx.create_tournament(Tournament {
            id: TournamentId(0),
            name: name.to_string(),
            status: TournamentStatus::Active,
            champion: None,
        })?;

        let participants = entities
            .iter()
            .map(|&entity| {
                tx.create_participant(Participant {
                    id: ParticipantId(0),
                    tournament: tournament.id,
                    entity,
                    current_score: Some(config.starting_score),
                    eliminated: false,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut battles = Vec::with_capacity(total as usize);
        for battle_number in 1..=total {
            let round_number = round_of(battle_number, total).ok_or_else(|| {
                BracketError::invalid_state(format!("battle #{} has no round", battle_number))
            })?;
            let (slot1, slot2) = if round_number == 1 {
                let first = (battle_number as usize - 1) * 2;
                (
                    Some(participants[first].id),
                    Some(participants[first + 1].id),
                )
            } else {
                (None, None)
            };

            battles.push(tx.create_battle(Battle {
                id: BattleId(0),
                tournament: tournament.id,
                battle_number,
                round_number,
                slot1,
                slot2,
                winner: None,
                shark_fight: shark_fights.contains(&battle_number),
                completed: false,
            })?);
        }

        info!(
            tournament = %tournament.id,
            name,
            participants = count,
            battles = total,
            "bracket seeded"
        );
        Ok(SeededBracket {
            tournament,
            participants,
            battles,
        })
    })
}

#[cfg(test)]
#[path = "seeding_tests.rs"]
mod seeding_tests;
