//! Bracket core for single-elimination tournaments
//!
//! This crate holds everything about a bracket that does not need storage:
//! - Identifiers and the persisted records (participants, battles, events)
//! - The battle numbering arithmetic that encodes the bracket tree
//! - The error taxonomy shared by the engine and its stores
//!
//! Battles are numbered 1..=P-1 round by round, so the tree never needs to be
//! stored: a battle's parent and slot follow from its number alone.

pub mod error;
pub mod topology;
pub mod types;

pub use error::*;
pub use topology::*;
pub use types::*;
