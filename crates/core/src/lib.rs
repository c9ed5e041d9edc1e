//! Domain primitives for the QuestForge gamification service.
//!
//! Everything here is pure: no I/O, no database access. The `db` and `api`
//! crates build on these types and rules.

pub mod error;
pub mod progress;
pub mod quest;
pub mod reward;
pub mod types;
pub mod user;
