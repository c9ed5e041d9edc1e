//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize`/plain create DTO for inserts
//! - Where the row must not leak as-is, a `Serialize` response type

pub mod quest;
pub mod reward;
pub mod user;
pub mod user_quest;
