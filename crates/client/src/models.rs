//! Request and response payloads, mirroring the server's JSON.

use questforge_core::progress::QuestStatus;
use questforge_core::quest::QuestTrigger;
use questforge_core::reward::RewardItem;
use questforge_core::types::{DbId, Timestamp};
use questforge_core::user::UserStatus;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// Body of `POST /quests`.
#[derive(Debug, Clone, Serialize)]
pub struct NewQuest {
    pub reward_id: DbId,
    pub name: String,
    pub description: String,
    pub streak: i32,
    pub duplication: i32,
    pub auto_claim: bool,
    pub trigger: QuestTrigger,
}

/// Body of `POST /rewards`.
#[derive(Debug, Clone, Serialize)]
pub struct NewReward {
    pub name: String,
    pub item: RewardItem,
    pub qty: i64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct QuestAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<DbId>,
    pub quest_id: DbId,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: Token,
    pub user_id: DbId,
    #[serde(default)]
    pub quest_updates: Vec<ProgressUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressUpdate {
    pub quest_id: DbId,
    pub quest_name: String,
    pub progress: i32,
    pub streak: i32,
    pub status: QuestStatus,
    pub reward_granted: bool,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: DbId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub user_id: DbId,
    pub username: String,
    pub status: UserStatus,
    pub gold: i64,
    pub diamonds: i64,
    pub login_count: i64,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reward {
    pub reward_id: DbId,
    pub name: String,
    pub item: RewardItem,
    pub qty: i64,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quest {
    pub quest_id: DbId,
    pub name: String,
    pub description: String,
    pub reward_id: DbId,
    pub reward_name: String,
    pub reward_item: RewardItem,
    pub reward_qty: i64,
    pub streak: i32,
    pub duplication: i32,
    pub auto_claim: bool,
    pub trigger: QuestTrigger,
    pub created_at: Timestamp,
}

/// An assignment joined with its quest.
#[derive(Debug, Clone, Deserialize)]
pub struct UserQuest {
    pub user_quest_id: DbId,
    pub user_id: DbId,
    pub quest_id: DbId,
    pub name: String,
    pub description: String,
    pub status: QuestStatus,
    pub progress: i32,
    pub streak: i32,
    pub duplication: i32,
    pub auto_claim: bool,
    pub assigned_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub claimed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressResponse {
    pub message: String,
    pub user_quest: UserQuest,
    pub reward_granted: Option<Reward>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimResponse {
    pub message: String,
    pub reward: Reward,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserWithQuests {
    #[serde(flatten)]
    pub user: User,
    pub quests: Vec<UserQuest>,
}

/// Error body returned by the server on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}
