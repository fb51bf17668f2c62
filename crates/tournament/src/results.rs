//! Tournament report storage and rendering

use bracket_core::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::store::BracketStore;

/// Snapshot of a tournament: its record, bracket and standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentReport {
    pub tournament: Tournament,
    /// Battles in bracket order
    pub battles: Vec<Battle>,
    /// Best score first
    pub standings: Vec<Standing>,
}

/// One row of the standings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub participant: ParticipantId,
    pub entity: EntityId,
    pub score: i32,
    pub eliminated: bool,
}

impl From<&Participant> for Standing {
    fn from(p: &Participant) -> Self {
        Self {
            participant: p.id,
            entity: p.entity,
            score: p.score(),
            eliminated: p.eliminated,
        }
    }
}

impl TournamentReport {
    pub fn from_store<S: BracketStore>(store: &S, tournament: TournamentId) -> Result<Self> {
        Ok(Self {
            tournament: store.tournament(tournament)?,
            battles: store.bracket(tournament)?,
            standings: store
                .standings(tournament)?
                .iter()
                .map(Standing::from)
                .collect(),
        })
    }

    /// Save report to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BracketError::storage(format!("Failed to serialize: {}", e)))?;
        std::fs::write(path, json)
            .map_err(|e| BracketError::storage(format!("Failed to write: {}", e)))
    }

    /// Load report from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BracketError::storage(format!("Failed to read: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| BracketError::storage(format!("Failed to parse: {}", e)))
    }

    fn entity_of(&self, participant: Option<ParticipantId>) -> String {
        participant
            .and_then(|id| self.standings.iter().find(|s| s.participant == id))
            .map(|s| format!("#{}", s.entity))
            .unwrap_or_else(|| "-".to_string())
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let t = &self.tournament;
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n\n", t.name));
        report.push_str(&format!("Status: {}\n", t.status));
        report.push_str(&format!(
            "Champion: {}\n\n",
            t.champion
                .map(|e| format!("#{}", e))
                .unwrap_or_else(|| "-".to_string())
        ));

        report.push_str("Bracket:\n");
        report.push_str(&format!(
            "{:>6} {:>6} {:>10} {:>10} {:>10} {:>6}\n",
            "Battle", "Round", "Slot 1", "Slot 2", "Winner", "Shark"
        ));
        report.push_str(&"-".repeat(53));
        report.push('\n');
        for b in &self.battles {
            report.push_str(&format!(
                "{:>6} {:>6} {:>10} {:>10} {:>10} {:>6}\n",
                b.battle_number,
                b.round_number,
                self.entity_of(b.slot1),
                self.entity_of(b.slot2),
                self.entity_of(b.winner),
                if b.shark_fight { "yes" } else { "" }
            ));
        }

        report.push_str("\nStandings:\n");
        report.push_str(&format!("{:<10} {:>8} {:>12}\n", "Entity", "Score", "Eliminated"));
        report.push_str(&"-".repeat(32));
        report.push('\n');
        for s in &self.standings {
            report.push_str(&format!(
                "{:<10} {:>8} {:>12}\n",
                format!("#{}", s.entity),
                s.score,
                if s.eliminated { "yes" } else { "no" }
            ));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
