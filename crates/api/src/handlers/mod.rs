pub mod auth;
pub mod quests;
pub mod rewards;
pub mod sign_in;
pub mod user_quests;
pub mod users;
