//! Battle numbering arithmetic.
//!
//! A bracket of `P` participants (a power of two) has `P - 1` battles numbered
//! consecutively round by round: round 1 holds battles `1..=P/2`, round 2 the
//! next `P/4`, and so on down to the final, which is always battle `P - 1`.
//!
//! ```text
//! P = 8    round 1      round 2    final
//!          1 ─┐
//!             ├─ 5 ─┐
//!          2 ─┘     │
//!                   ├─ 7
//!          3 ─┐     │
//!             ├─ 6 ─┘
//!          4 ─┘
//! ```
//!
//! The winner of an odd-numbered battle takes the first slot of its parent,
//! the winner of an even-numbered battle the second.

use crate::error::{BracketError, Result};
use crate::types::Slot;

/// Number of battles needed to reduce `participant_count` entrants to one.
pub fn total_battles(participant_count: u32) -> Result<u32> {
    if participant_count < 2 {
        return Err(BracketError::invalid_state(format!(
            "a bracket needs at least 2 participants, found {}",
            participant_count
        )));
    }
    Ok(participant_count - 1)
}

#[inline]
pub fn is_final_battle(battle_number: u32, total_battles: u32) -> bool {
    battle_number == total_battles
}

/// Number of the battle the winner of `battle_number` advances to.
///
/// The final battle has no parent and maps to itself. The result for numbers
/// outside `1..=total_battles` is meaningless; callers check with
/// [`contains_battle`] first.
pub fn parent_battle_number(battle_number: u32, total_battles: u32) -> u32 {
    if is_final_battle(battle_number, total_battles) {
        return battle_number;
    }

    let mut battle_count_in_round = (total_battles + 1) / 2;
    let mut first_battle_in_round = 1;

    while battle_count_in_round > 0
        && battle_number > first_battle_in_round + battle_count_in_round - 1
    {
        first_battle_in_round += battle_count_in_round;
        battle_count_in_round /= 2;
    }

    let offset = battle_number.saturating_sub(first_battle_in_round);
    first_battle_in_round + battle_count_in_round + offset / 2
}

/// Slot of the parent battle that receives the winner of `battle_number`.
#[inline]
pub fn parent_slot(battle_number: u32) -> Slot {
    if battle_number % 2 == 1 {
        Slot::First
    } else {
        Slot::Second
    }
}

pub fn contains_battle(battle_number: u32, total_battles: u32) -> bool {
    (1..=total_battles).contains(&battle_number)
}

/// Brackets are complete binary trees, so only powers of two are playable.
pub fn is_valid_bracket_size(participant_count: u32) -> bool {
    participant_count >= 2 && participant_count.is_power_of_two()
}

/// Battle counts per round, first round first. `[4, 2, 1]` for 8 participants.
pub fn round_sizes(participant_count: u32) -> Vec<u32> {
    let mut sizes = Vec::new();
    let mut count = participant_count / 2;
    while count > 0 {
        sizes.push(count);
        count /= 2;
    }
    sizes
}

/// Round (1-based) that `battle_number` belongs to, or `None` outside the bracket.
pub fn round_of(battle_number: u32, total_battles: u32) -> Option<u32> {
    if !contains_battle(battle_number, total_battles) {
        return None;
    }
    let mut last_battle_in_round = 0;
    for (round, size) in round_sizes(total_battles + 1).into_iter().enumerate() {
        last_battle_in_round += size;
        if battle_number <= last_battle_in_round {
            return Some(round as u32 + 1);
        }
    }
    None
}

#[cfg(test)]
#[path = "topology_tests.rs"]
mod topology_tests;
