//! Integration tests for the repository layer against an in-memory database.
//!
//! Covers:
//! - Migrations and the seeded sign-in quest
//! - Unique usernames and the single-active-assignment index
//! - Guarded progress steps and reward crediting
//! - Claim idempotency

use assert_matches::assert_matches;
use questforge_core::progress::{advance, QuestStatus};
use questforge_core::quest::QuestTrigger;
use questforge_core::reward::{RewardItem, MAX_REWARD_QTY};
use questforge_core::user::UserStatus;
use questforge_db::models::quest::CreateQuest;
use questforge_db::models::reward::CreateReward;
use questforge_db::models::user::{CreateUser, User};
use questforge_db::repositories::{QuestRepo, RewardRepo, UserQuestRepo, UserRepo};
use questforge_db::DbPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn test_pool() -> DbPool {
    let pool = questforge_db::create_memory_pool()
        .await
        .expect("in-memory pool should open");
    questforge_db::run_migrations(&pool)
        .await
        .expect("migrations should apply");
    pool
}

async fn create_user(pool: &DbPool, username: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        status: UserStatus::New,
        gold: 20,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

async fn create_quest(pool: &DbPool, streak: i32, duplication: i32, auto_claim: bool) -> i64 {
    let reward = RewardRepo::create(
        pool,
        &CreateReward {
            name: "Pouch of gold".to_string(),
            item: RewardItem::Gold,
            qty: 15,
        },
    )
    .await
    .expect("reward creation should succeed");

    let quest = QuestRepo::create(
        pool,
        &CreateQuest {
            reward_id: reward.id,
            name: "Slay ten slimes".to_string(),
            description: "Report each slime".to_string(),
            auto_claim,
            streak,
            duplication,
            trigger: QuestTrigger::Manual,
        },
    )
    .await
    .expect("quest creation should succeed");
    quest.id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn migrations_seed_sign_in_quest() {
    let pool = test_pool().await;

    let sign_in = QuestRepo::list_by_trigger(&pool, QuestTrigger::SignIn)
        .await
        .unwrap();
    assert_eq!(sign_in.len(), 1);
    let quest = &sign_in[0];
    assert_eq!(quest.name, "Sign In Three Times");
    assert_eq!(quest.streak, 3);
    assert_eq!(quest.duplication, 2);
    assert!(!quest.auto_claim);
    assert_eq!(quest.reward_item, "diamond");
    assert_eq!(quest.reward_qty, 10);
}

#[tokio::test]
async fn duplicate_username_is_a_unique_violation() {
    let pool = test_pool().await;
    create_user(&pool, "alice").await;

    let err = UserRepo::create(
        &pool,
        &CreateUser {
            username: "alice".to_string(),
            password_hash: "x".to_string(),
            status: UserStatus::New,
            gold: 0,
        },
    )
    .await
    .expect_err("second alice must be rejected");

    assert_matches!(err, sqlx::Error::Database(db) if db.is_unique_violation());
}

#[tokio::test]
async fn record_login_promotes_new_users() {
    let pool = test_pool().await;
    let user = create_user(&pool, "newbie").await;
    assert_eq!(user.status, "new");

    let after = UserRepo::record_login(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after.login_count, 1);
    assert_eq!(after.status, "not_new");

    UserRepo::update_status(&pool, user.id, UserStatus::Banned)
        .await
        .unwrap();
    let banned = UserRepo::record_login(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(banned.status, "banned", "login must not un-ban a user");
}

#[tokio::test]
async fn only_one_active_assignment_per_quest() {
    let pool = test_pool().await;
    let user = create_user(&pool, "bob").await;
    let quest_id = create_quest(&pool, 2, 3, false).await;

    UserQuestRepo::assign(&pool, user.id, quest_id).await.unwrap();
    let err = UserQuestRepo::assign(&pool, user.id, quest_id)
        .await
        .expect_err("second active assignment must be rejected");
    assert_matches!(err, sqlx::Error::Database(db) if db.is_unique_violation());

    assert_eq!(UserQuestRepo::count_for(&pool, user.id, quest_id).await.unwrap(), 1);
}

#[tokio::test]
async fn manual_claim_credits_reward_once() {
    let pool = test_pool().await;
    let user = create_user(&pool, "carol").await;
    let quest_id = create_quest(&pool, 1, 1, false).await;
    let quest = QuestRepo::find_by_id(&pool, quest_id).await.unwrap().unwrap();

    let assignment = UserQuestRepo::assign(&pool, user.id, quest_id).await.unwrap();
    let step = advance(&quest.rules(), QuestStatus::InProgress, 0).unwrap();
    assert_eq!(step.status, QuestStatus::Completed);

    let completed = UserQuestRepo::apply_step(
        &pool,
        assignment.id,
        QuestStatus::InProgress,
        0,
        &step,
        quest.grant().unwrap(),
    )
    .await
    .unwrap()
    .expect("step should apply");
    assert_eq!(completed.status, "completed");
    assert!(completed.completed_at.is_some());

    // Completing without auto-claim grants nothing yet.
    let before = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(before.gold, 20);

    let claimed = UserQuestRepo::claim(&pool, assignment.id, quest.grant().unwrap())
        .await
        .unwrap()
        .expect("claim should apply");
    assert_eq!(claimed.status, "claimed");
    assert!(claimed.claimed_at.is_some());

    let after = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after.gold, 35);

    let again = UserQuestRepo::claim(&pool, assignment.id, quest.grant().unwrap())
        .await
        .unwrap();
    assert!(again.is_none(), "a claimed assignment cannot be claimed twice");
    let unchanged = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(unchanged.gold, 35);
}

#[tokio::test]
async fn auto_claim_step_credits_in_same_transaction() {
    let pool = test_pool().await;
    let user = create_user(&pool, "dave").await;
    let quest_id = create_quest(&pool, 1, 1, true).await;
    let quest = QuestRepo::find_by_id(&pool, quest_id).await.unwrap().unwrap();

    let assignment = UserQuestRepo::assign(&pool, user.id, quest_id).await.unwrap();
    let step = advance(&quest.rules(), QuestStatus::InProgress, 0).unwrap();
    assert!(step.grants_reward);

    let claimed = UserQuestRepo::apply_step(
        &pool,
        assignment.id,
        QuestStatus::InProgress,
        0,
        &step,
        quest.grant().unwrap(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(claimed.status, "claimed");

    let after = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after.gold, 35);
}

#[tokio::test]
async fn stale_step_is_not_applied() {
    let pool = test_pool().await;
    let user = create_user(&pool, "erin").await;
    let quest_id = create_quest(&pool, 3, 1, false).await;
    let quest = QuestRepo::find_by_id(&pool, quest_id).await.unwrap().unwrap();
    let assignment = UserQuestRepo::assign(&pool, user.id, quest_id).await.unwrap();

    let step = advance(&quest.rules(), QuestStatus::InProgress, 0).unwrap();
    let first = UserQuestRepo::apply_step(
        &pool,
        assignment.id,
        QuestStatus::InProgress,
        0,
        &step,
        quest.grant().unwrap(),
    )
    .await
    .unwrap();
    assert!(first.is_some());

    // Same step computed from the same (now outdated) state.
    let second = UserQuestRepo::apply_step(
        &pool,
        assignment.id,
        QuestStatus::InProgress,
        0,
        &step,
        quest.grant().unwrap(),
    )
    .await
    .unwrap();
    assert!(second.is_none());

    let detail = UserQuestRepo::find_detail(&pool, assignment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.progress, 1);
    assert_eq!(detail.streak, 3);
}

#[tokio::test]
async fn claimed_assignment_frees_slot_for_next_duplicate() {
    let pool = test_pool().await;
    let user = create_user(&pool, "frank").await;
    let quest_id = create_quest(&pool, 1, 2, true).await;
    let quest = QuestRepo::find_by_id(&pool, quest_id).await.unwrap().unwrap();

    let first = UserQuestRepo::assign(&pool, user.id, quest_id).await.unwrap();
    let step = advance(&quest.rules(), QuestStatus::InProgress, 0).unwrap();
    UserQuestRepo::apply_step(
        &pool,
        first.id,
        QuestStatus::InProgress,
        0,
        &step,
        quest.grant().unwrap(),
    )
    .await
    .unwrap()
    .unwrap();

    assert!(UserQuestRepo::find_active(&pool, user.id, quest_id)
        .await
        .unwrap()
        .is_none());
    let second = UserQuestRepo::assign(&pool, user.id, quest_id).await.unwrap();

    let latest = UserQuestRepo::find_latest(&pool, user.id, quest_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, second.id);
    assert_eq!(UserQuestRepo::count_for(&pool, user.id, quest_id).await.unwrap(), 2);

    let details = UserQuestRepo::list_details_for_user(&pool, user.id).await.unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].status, "claimed");
    assert_eq!(details[1].status, "in_progress");
}

#[tokio::test]
async fn quest_with_unknown_reward_is_rejected() {
    let pool = test_pool().await;

    let err = QuestRepo::create(
        &pool,
        &CreateQuest {
            reward_id: 9_999,
            name: "Orphan".to_string(),
            description: String::new(),
            auto_claim: false,
            streak: 1,
            duplication: 1,
            trigger: QuestTrigger::Manual,
        },
    )
    .await
    .expect_err("foreign key must be enforced");
    assert_matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation());
}

#[tokio::test]
async fn reward_qty_above_cap_is_rejected() {
    let pool = test_pool().await;

    let err = RewardRepo::create(
        &pool,
        &CreateReward {
            name: "Dragon hoard".to_string(),
            item: RewardItem::Gold,
            qty: MAX_REWARD_QTY + 1,
        },
    )
    .await
    .expect_err("qty CHECK must be enforced");
    assert_matches!(err, sqlx::Error::Database(db) if db.is_check_violation());
}

#[tokio::test]
async fn overflowing_claim_rolls_back() {
    let pool = test_pool().await;
    let user = create_user(&pool, "gwen").await;
    let quest_id = create_quest(&pool, 1, 1, false).await;
    let quest = QuestRepo::find_by_id(&pool, quest_id).await.unwrap().unwrap();

    let assignment = UserQuestRepo::assign(&pool, user.id, quest_id).await.unwrap();
    let step = advance(&quest.rules(), QuestStatus::InProgress, 0).unwrap();
    UserQuestRepo::apply_step(
        &pool,
        assignment.id,
        QuestStatus::InProgress,
        0,
        &step,
        quest.grant().unwrap(),
    )
    .await
    .unwrap()
    .unwrap();

    let near_max = i64::MAX - 5;
    sqlx::query("UPDATE users SET gold = ?1 WHERE id = ?2")
        .bind(near_max)
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let err = UserQuestRepo::claim(&pool, assignment.id, quest.grant().unwrap())
        .await
        .expect_err("a credit past i64::MAX must fail");
    assert_matches!(err, sqlx::Error::Database(db) if db.is_check_violation());

    // Balance untouched and still readable as an integer.
    let after = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after.gold, near_max);
    assert_eq!(UserRepo::list(&pool).await.unwrap().len(), 1);

    let detail = UserQuestRepo::find_detail(&pool, assignment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.status, "completed", "claim must roll back with the credit");
}
