//! Scoring configuration, loadable from TOML.

use bracket_core::{BracketError, Result, DEFAULT_STARTING_SCORE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Points a shark-fight winner receives for the random draw
pub const TIE_BREAK_BONUS: i32 = 2;

/// Points a winner receives for advancing out of a battle
pub const ADVANCEMENT_BONUS: i32 = 30;

/// When a resolution writes the tournament's champion and `COMPLETED` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionPolicy {
    /// Every resolved battle names its winner champion, so the final one sticks
    #[default]
    EveryResolution,
    /// Only the final battle completes the tournament
    FinalOnly,
}

/// Which resolutions pay out the advancement bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BonusScope {
    #[default]
    EveryRound,
    FinalOnly,
}

/// Scoring rules for a tournament.
///
/// ```toml
/// starting_score = 70
/// tie_break_bonus = 2
/// advancement_bonus = 30
/// completion = "final-only"
/// advancement_bonus_scope = "every-round"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub starting_score: i32,
    pub tie_break_bonus: i32,
    pub advancement_bonus: i32,
    pub completion: CompletionPolicy,
    pub advancement_bonus_scope: BonusScope,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            starting_score: DEFAULT_STARTING_SCORE,
            tie_break_bonus: TIE_BREAK_BONUS,
            advancement_bonus: ADVANCEMENT_BONUS,
            completion: CompletionPolicy::default(),
            advancement_bonus_scope: BonusScope::default(),
        }
    }
}

impl ScoringConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BracketError::storage(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| BracketError::storage(format!("Failed to parse config: {}", e)))
    }

    /// Whether resolving this battle writes champion and status
    pub fn completes_tournament(&self, is_final: bool) -> bool {
        is_final || self.completion == CompletionPolicy::EveryResolution
    }

    pub fn pays_advancement_bonus(&self, is_final: bool) -> bool {
        is_final || self.advancement_bonus_scope == BonusScope::EveryRound
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
