//! HTTP-level integration tests for signup, register, login, token and logout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_form, post_json, post_json_auth};
use questforge_core::user::UserStatus;
use questforge_db::repositories::UserRepo;
use serde_json::json;

// ---------------------------------------------------------------------------
// Signup / register
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signup_returns_token_and_credits_bonus() {
    let pool = common::test_pool().await;
    let app = common::build_test_app(pool.clone());

    let response = post_json(app, "/signup", json!({ "username": "alice", "password": "hunter22" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["expires_in"], 3600);

    let user = UserRepo::find_by_username(&pool, "alice").await.unwrap().unwrap();
    assert_eq!(user.gold, 20);
    assert_eq!(user.diamonds, 0);
    assert_eq!(user.status, "new");
    assert!(user.password_hash.starts_with("$argon2id$"), "password must be hashed");
}

#[tokio::test]
async fn signup_accepts_user_name_alias() {
    let app = common::build_test_app(common::test_pool().await);

    let response = post_json(app, "/signup", json!({ "user_name": "bob", "password": "secret1" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn signup_only_accepts_new_status() {
    let pool = common::test_pool().await;

    for status in ["banned", "not_new", "royalty"] {
        let response = post_json(
            common::build_test_app(pool.clone()),
            "/signup",
            json!({ "username": "mallory", "password": "secret1", "status": status }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "status {status}");
    }
    assert!(UserRepo::find_by_username(&pool, "mallory").await.unwrap().is_none());

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/signup",
        json!({ "username": "mallory", "password": "secret1", "status": "new" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = UserRepo::find_by_username(&pool, "mallory").await.unwrap().unwrap();
    assert_eq!(user.status, "new");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let pool = common::test_pool().await;
    common::signup(common::build_test_app(pool.clone()), "carol", "secret1").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/register",
        json!({ "username": "carol", "password": "another1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Username already exists");
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn register_returns_message_and_id() {
    let app = common::build_test_app(common::test_pool().await);

    let response = post_json(app, "/register", json!({ "username": "dave", "password": "secret1" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "User registered successfully");
    assert!(json["user_id"].is_i64());
}

#[tokio::test]
async fn weak_password_and_bad_username_fail_validation() {
    let pool = common::test_pool().await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/signup",
        json!({ "username": "erin", "password": "abc" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json(
        common::build_test_app(pool),
        "/signup",
        json!({ "username": "no spaces", "password": "secret1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login / token
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_token_and_promotes_new_user() {
    let pool = common::test_pool().await;
    common::signup(common::build_test_app(pool.clone()), "frank", "secret1").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/login",
        json!({ "username": "frank", "password": "secret1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["user_id"].is_i64());
    assert!(json["quest_updates"].is_array());

    let user = UserRepo::find_by_username(&pool, "frank").await.unwrap().unwrap();
    assert_eq!(user.status, "not_new");
    assert_eq!(user.login_count, 1);
}

#[tokio::test]
async fn login_with_wrong_password_returns_401() {
    let pool = common::test_pool().await;
    common::signup(common::build_test_app(pool.clone()), "gina", "secret1").await;

    let response = post_json(
        common::build_test_app(pool),
        "/login",
        json!({ "username": "gina", "password": "wrong-one" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["detail"], "Invalid username or password");
}

#[tokio::test]
async fn login_with_unknown_user_returns_401() {
    let app = common::build_test_app(common::test_pool().await);

    let response = post_json(app, "/login", json!({ "username": "ghost", "password": "whatever" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn banned_user_cannot_log_in() {
    let pool = common::test_pool().await;
    common::signup(common::build_test_app(pool.clone()), "henry", "secret1").await;
    let user = UserRepo::find_by_username(&pool, "henry").await.unwrap().unwrap();
    UserRepo::update_status(&pool, user.id, UserStatus::Banned)
        .await
        .unwrap();

    let response = post_json(
        common::build_test_app(pool),
        "/login",
        json!({ "username": "henry", "password": "secret1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["detail"], "User is banned");
}

#[tokio::test]
async fn token_endpoint_accepts_form_body() {
    let pool = common::test_pool().await;
    common::signup(common::build_test_app(pool.clone()), "ivy", "secret1").await;

    let response = post_form(
        common::build_test_app(pool),
        "/token",
        "username=ivy&password=secret1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
}

// ---------------------------------------------------------------------------
// Bearer auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn me_requires_a_valid_token() {
    let pool = common::test_pool().await;
    let token = common::signup(common::build_test_app(pool.clone()), "jack", "secret1").await;

    let response = get(common::build_test_app(pool.clone()), "/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(common::build_test_app(pool.clone()), "/users/me", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(common::build_test_app(pool), "/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "jack");
    assert_eq!(json["gold"], 20);
    assert!(json.get("password_hash").is_none(), "hash must never be serialized");
}

#[tokio::test]
async fn logout_requires_auth() {
    let pool = common::test_pool().await;
    let token = common::signup(common::build_test_app(pool.clone()), "kate", "secret1").await;

    let response = post_json(common::build_test_app(pool.clone()), "/logout", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response =
        post_json_auth(common::build_test_app(pool), "/logout", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Logged out successfully");
}
