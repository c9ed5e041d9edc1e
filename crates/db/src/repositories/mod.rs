//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument. Operations that must be
//! atomic open their own transaction internally.

pub mod quest_repo;
pub mod reward_repo;
pub mod user_quest_repo;
pub mod user_repo;

pub use quest_repo::QuestRepo;
pub use reward_repo::RewardRepo;
pub use user_quest_repo::UserQuestRepo;
pub use user_repo::UserRepo;
