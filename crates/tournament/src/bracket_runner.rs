//! Bracket runner for playing out a seeded tournament

use bracket_core::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;

use crate::coin::TieBreaker;
use crate::engine::AdvancementEngine;
use crate::store::BracketStore;

/// Event catalog installed by [`BracketRunner::install_event_types`]
pub const DEFAULT_EVENT_TYPES: &[(&str, i32)] = &[
    ("convincing pitch", 6),
    ("bugs in demo", -4),
    ("good user traction", 3),
    ("angry investor", -6),
    ("fake news pitch", -8),
];

/// Configuration for a run
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Seed for event draws and for settling non-shark ties
    pub seed: u64,
    /// Random events recorded for each contender before a battle is decided
    pub events_per_contender: u32,
    /// Print progress during the run
    pub verbose: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            events_per_contender: 1,
            verbose: true,
        }
    }
}

/// What happened during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub resolved: u32,
    pub tie_breaks: u32,
    pub events: u32,
    pub champion: Option<EntityId>,
}

/// Plays every battle of a tournament in bracket order.
///
/// The higher score wins. Equal scores go to the engine's coin when the
/// battle is a shark fight, otherwise the runner settles them itself.
pub struct BracketRunner {
    config: RunnerConfig,
    rng: StdRng,
}

impl BracketRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    pub fn install_event_types<S: BracketStore>(store: &mut S) -> Result<Vec<EventType>> {
        DEFAULT_EVENT_TYPES
            .iter()
            .map(|&(name, score_modifier)| {
                store.create_event_type(EventType {
                    id: EventTypeId(0),
                    name: name.to_string(),
                    score_modifier,
                })
            })
            .collect()
    }

    pub fn run<S: BracketStore, C: TieBreaker>(
        &mut self,
        engine: &mut AdvancementEngine<C>,
        store: &mut S,
        tournament: TournamentId,
        event_types: &[EventType],
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let ids: Vec<BattleId> = store.bracket(tournament)?.iter().map(|b| b.id).collect();
        let total = ids.len();

        for id in ids {
            let battle = store.battle(id)?;
            if battle.is_resolved() {
                continue;
            }
            let (first, second) = battle.contenders().ok_or_else(|| {
                BracketError::invalid_state(format!(
                    "battle #{} never received both contenders",
                    battle.battle_number
                ))
            })?;

            for contender in [first, second] {
                for _ in 0..self.config.events_per_contender {
                    if let Some(kind) = event_types.choose(&mut self.rng) {
                        engine.record_event(store, battle.id, contender, kind.id)?;
                        summary.events += 1;
                    }
                }
            }

            let a = store.participant(first)?;
            let b = store.participant(second)?;
            let winner = match a.score().cmp(&b.score()) {
                Ordering::Greater => Some(first),
                Ordering::Less => Some(second),
                Ordering::Equal if battle.shark_fight => None,
                Ordering::Equal => Some(if self.rng.gen_bool(0.5) { first } else { second }),
            };
            if winner.is_none() {
                summary.tie_breaks += 1;
            }

            let resolved = engine.resolve_battle(store, battle.id, winner)?;
            summary.resolved += 1;

            if self.config.verbose {
                let won = resolved.winner.map(|w| w == first);
                println!(
                    "Battle {}/{} (round {}): {} [{}] vs {} [{}] -> {}{}",
                    resolved.battle_number,
                    total,
                    resolved.round_number,
                    a.entity,
                    a.score(),
                    b.entity,
                    b.score(),
                    match won {
                        Some(true) => a.entity.to_string(),
                        Some(false) => b.entity.to_string(),
                        None => "-".to_string(),
                    },
                    if winner.is_none() { " (shark fight)" } else { "" }
                );
            }
        }

        summary.champion = store.tournament(tournament)?.champion;
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "bracket_runner_tests.rs"]
mod bracket_runner_tests;
