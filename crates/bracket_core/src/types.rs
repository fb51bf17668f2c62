//! Identifiers and persisted records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score every participant starts a tournament with
pub const DEFAULT_STARTING_SCORE: i32 = 70;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Tournament record id
    TournamentId
);
id_type!(
    /// Id of a participant's entry in one tournament
    ParticipantId
);
id_type!(
    /// Id of the underlying competing entity, shared across tournaments
    EntityId
);
id_type!(BattleId);
id_type!(EventTypeId);
id_type!(EventId);

/// One of the two participant positions of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::First => write!(f, "slot1"),
            Slot::Second => write!(f, "slot2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    #[default]
    Active,
    Completed,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentStatus::Active => write!(f, "ACTIVE"),
            TournamentStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub status: TournamentStatus,
    /// Entity credited with the win; see `CompletionPolicy` for when it is written
    #[serde(default)]
    pub champion: Option<EntityId>,
}

/// A competing entity's entry in one tournament.
///
/// The score and elimination flag are only ever changed by the score ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub tournament: TournamentId,
    pub entity: EntityId,
    /// Running score; records without one count as zero
    #[serde(default)]
    pub current_score: Option<i32>,
    #[serde(default)]
    pub eliminated: bool,
}

impl Participant {
    pub fn score(&self) -> i32 {
        self.current_score.unwrap_or(0)
    }
}

/// A single match of the bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,
    pub tournament: TournamentId,
    /// Position in the bracket, 1..=P-1, assigned at creation
    pub battle_number: u32,
    pub round_number: u32,
    #[serde(default)]
    pub slot1: Option<ParticipantId>,
    #[serde(default)]
    pub slot2: Option<ParticipantId>,
    #[serde(default)]
    pub winner: Option<ParticipantId>,
    /// Pre-marked as eligible for a random tie-break
    #[serde(default)]
    pub shark_fight: bool,
    #[serde(default)]
    pub completed: bool,
}

impl Battle {
    pub fn slot(&self, slot: Slot) -> Option<ParticipantId> {
        match slot {
            Slot::First => self.slot1,
            Slot::Second => self.slot2,
        }
    }

    pub fn set_slot(&mut self, slot: Slot, participant: ParticipantId) {
        match slot {
            Slot::First => self.slot1 = Some(participant),
            Slot::Second => self.slot2 = Some(participant),
        }
    }

    /// Both occupants, if the battle is ready to be fought
    pub fn contenders(&self) -> Option<(ParticipantId, ParticipantId)> {
        Some((self.slot1?, self.slot2?))
    }

    /// Which slot `participant` occupies, if any
    pub fn slot_of(&self, participant: ParticipantId) -> Option<Slot> {
        if self.slot1 == Some(participant) {
            Some(Slot::First)
        } else if self.slot2 == Some(participant) {
            Some(Slot::Second)
        } else {
            None
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }
}

/// Reference data: something that can happen during a battle and what it is worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    pub id: EventTypeId,
    pub name: String,
    pub score_modifier: i32,
}

/// Append-only record of an event happening to a participant in a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub id: EventId,
    pub battle: BattleId,
    pub participant: ParticipantId,
    pub event_type: EventTypeId,
    /// Seconds since the Unix epoch
    pub recorded_at: u64,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
