//! Single-elimination tournament engine
//!
//! This crate provides infrastructure for:
//! - Seeding a bracket of battles for a power-of-two field
//! - Resolving battles and advancing winners up the bracket
//! - Score bookkeeping for events, tie-breaks and advancement
//! - Playing out whole tournaments and reporting on them
//!
//! # Usage
//!
//! ```bash
//! # Seed and play out an 8-entrant bracket with two shark fights
//! cargo run -p tournament -- simulate 8 --seed 42 --shark 1,5 --out cup.json
//!
//! # Show a saved report
//! cargo run -p tournament -- report cup.json
//! ```

mod bracket_runner;
mod coin;
mod config;
mod engine;
mod ledger;
mod results;
mod seeding;
mod store;

pub use bracket_runner::*;
pub use coin::*;
pub use config::*;
pub use engine::*;
pub use ledger::*;
pub use results::*;
pub use seeding::*;
pub use store::*;
