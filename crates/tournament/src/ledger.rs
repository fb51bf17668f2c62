//! Score and elimination bookkeeping for participants.
//!
//! Each call is a read-modify-write of one participant record, persisted
//! immediately. Concurrent writers to the same participant are not guarded
//! against here; the store is expected to be used by one writer at a time.

use bracket_core::{BracketError, EventType, Participant, ParticipantId, Result};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::store::BracketStore;

#[derive(Debug, Clone, Copy)]
pub struct ScoreLedger {
    tie_break_bonus: i32,
    advancement_bonus: i32,
}

impl ScoreLedger {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            tie_break_bonus: config.tie_break_bonus,
            advancement_bonus: config.advancement_bonus,
        }
    }

    /// Apply an event's modifier. Must run once per event record, at creation.
    pub fn apply_event<S: BracketStore>(
        &self,
        store: &mut S,
        participant: ParticipantId,
        event_type: &EventType,
    ) -> Result<Participant> {
        self.adjust(store, participant, event_type.score_modifier, &event_type.name)
    }

    pub fn apply_tie_break_bonus<S: BracketStore>(
        &self,
        store: &mut S,
        winner: ParticipantId,
    ) -> Result<Participant> {
        self.adjust(store, winner, self.tie_break_bonus, "tie-break")
    }

    pub fn apply_advancement_bonus<S: BracketStore>(
        &self,
        store: &mut S,
        winner: ParticipantId,
    ) -> Result<Participant> {
        self.adjust(store, winner, self.advancement_bonus, "advancement")
    }

    pub fn mark_eliminated<S: BracketStore>(
        &self,
        store: &mut S,
        loser: ParticipantId,
    ) -> Result<Participant> {
        let mut participant = store.participant(loser)?;
        participant.eliminated = true;
        debug!(participant = %loser, "eliminated");
        store.save_participant(participant)
    }

    fn adjust<S: BracketStore>(
        &self,
        store: &mut S,
        id: ParticipantId,
        delta: i32,
        reason: &str,
    ) -> Result<Participant> {
        let mut participant = store.participant(id)?;
        let before = participant.score();
        let after = before.checked_add(delta).ok_or_else(|| {
            BracketError::invalid_state(format!(
                "score of participant {} would overflow ({} {:+})",
                id, before, delta
            ))
        })?;
        participant.current_score = Some(after);
        debug!(participant = %id, reason, before, after, "score adjusted");
        store.save_participant(participant)
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod ledger_tests;
