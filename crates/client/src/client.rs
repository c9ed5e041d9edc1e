//! The [`Client`] itself: one method per API endpoint.
//!
//! Every method performs exactly one HTTP request. There are no retries;
//! failures surface as [`ClientError`] carrying the server's `detail`.

use std::sync::Arc;

use questforge_core::types::DbId;
use questforge_core::user::UserStatus;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::models::{
    ClaimResponse, Credentials, ErrorBody, LoginResponse, MessageResponse, NewQuest, NewReward,
    ProgressResponse, Quest, QuestAction, RegisterResponse, Reward, SignupRequest, Token, User,
    UserQuest, UserWithQuests,
};
use crate::token_store::{MemoryTokenStore, TokenStore};

/// HTTP client for a QuestForge server.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl Client {
    /// Create a client for `base_url` (e.g. `http://localhost:8000`) with an
    /// in-memory token store.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_store(base_url, Arc::new(MemoryTokenStore::new()))
    }

    /// Create a client that keeps its token in `tokens`.
    pub fn with_store(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, tokens)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The stored access token, if any.
    pub fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.tokens.load()?)
    }

    pub fn is_authenticated(&self) -> Result<bool, ClientError> {
        Ok(self.tokens.load()?.is_some())
    }

    // ---- account ----

    /// `POST /signup`; stores the returned token.
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        status: Option<UserStatus>,
    ) -> Result<Token, ClientError> {
        let body = SignupRequest {
            username,
            password,
            status,
        };
        let token: Token = Self::parse(self.http.post(self.url("/signup")).json(&body)).await?;
        self.tokens.save(&token.access_token)?;
        Ok(token)
    }

    /// `POST /register`; does not log in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisterResponse, ClientError> {
        let body = Credentials { username, password };
        Self::parse(self.http.post(self.url("/register")).json(&body)).await
    }

    /// `POST /login`; stores the returned token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = Credentials { username, password };
        let response: LoginResponse =
            Self::parse(self.http.post(self.url("/login")).json(&body)).await?;
        self.tokens.save(&response.token.access_token)?;
        tracing::debug!(user_id = response.user_id, "Logged in");
        Ok(response)
    }

    /// `POST /token` with a form body; stores the returned token.
    pub async fn token_login(&self, username: &str, password: &str) -> Result<Token, ClientError> {
        let form = [("username", username), ("password", password)];
        let token: Token = Self::parse(self.http.post(self.url("/token")).form(&form)).await?;
        self.tokens.save(&token.access_token)?;
        Ok(token)
    }

    /// `POST /logout`, then forget the stored token.
    ///
    /// The token is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        let request = self.authed(self.http.post(self.url("/logout")))?;
        let result = Self::parse(request).await;
        self.tokens.clear()?;
        result
    }

    // ---- users ----

    pub async fn users(&self) -> Result<Vec<User>, ClientError> {
        Self::parse(self.http.get(self.url("/users"))).await
    }

    pub async fn user(&self, user_id: DbId) -> Result<User, ClientError> {
        Self::parse(self.http.get(self.url(&format!("/users/{user_id}")))).await
    }

    /// `GET /users/me` for the stored token.
    pub async fn me(&self) -> Result<User, ClientError> {
        Self::parse(self.authed(self.http.get(self.url("/users/me")))?).await
    }

    pub async fn users_with_quests(&self) -> Result<Vec<UserWithQuests>, ClientError> {
        Self::parse(self.http.get(self.url("/users-with-quests"))).await
    }

    // ---- catalog ----

    pub async fn quests(&self) -> Result<Vec<Quest>, ClientError> {
        Self::parse(self.http.get(self.url("/quests"))).await
    }

    pub async fn quest(&self, quest_id: DbId) -> Result<Quest, ClientError> {
        Self::parse(self.http.get(self.url(&format!("/quests/{quest_id}")))).await
    }

    pub async fn create_quest(&self, quest: &NewQuest) -> Result<Quest, ClientError> {
        Self::parse(self.authed(self.http.post(self.url("/quests")).json(quest))?).await
    }

    pub async fn rewards(&self) -> Result<Vec<Reward>, ClientError> {
        Self::parse(self.http.get(self.url("/rewards"))).await
    }

    pub async fn reward(&self, reward_id: DbId) -> Result<Reward, ClientError> {
        Self::parse(self.http.get(self.url(&format!("/rewards/{reward_id}")))).await
    }

    pub async fn create_reward(&self, reward: &NewReward) -> Result<Reward, ClientError> {
        Self::parse(self.authed(self.http.post(self.url("/rewards")).json(reward))?).await
    }

    // ---- assignments ----

    /// `POST /assign-quest` for the logged-in user.
    pub async fn assign_quest(&self, quest_id: DbId) -> Result<UserQuest, ClientError> {
        self.quest_action("/assign-quest", quest_id).await
    }

    /// `POST /complete-quest`: one progress step for the logged-in user.
    pub async fn complete_quest(&self, quest_id: DbId) -> Result<ProgressResponse, ClientError> {
        self.quest_action("/complete-quest", quest_id).await
    }

    /// `POST /claim-reward` for the logged-in user.
    pub async fn claim_reward(&self, quest_id: DbId) -> Result<ClaimResponse, ClientError> {
        self.quest_action("/claim-reward", quest_id).await
    }

    pub async fn user_quests(&self, user_id: DbId) -> Result<Vec<UserQuest>, ClientError> {
        Self::parse(self.http.get(self.url(&format!("/user-quests/{user_id}")))).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the stored bearer token, failing early when there is none.
    fn authed(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.tokens.load()?.ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn quest_action<T: DeserializeOwned>(
        &self,
        path: &str,
        quest_id: DbId,
    ) -> Result<T, ClientError> {
        let body = QuestAction {
            user_id: None,
            quest_id,
        };
        Self::parse(self.authed(self.http.post(self.url(path)).json(&body))?).await
    }

    /// Send the request and decode a 2xx JSON body, or turn the error body
    /// into [`ClientError::Api`].
    async fn parse<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::ensure_success(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn ensure_success(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        tracing::debug!(status = status.as_u16(), %detail, "API call failed");
        Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}
