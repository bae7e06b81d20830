//! In-process stand-in for the Hack or Snooze story API.
//!
//! Implements the endpoints the web client calls, with the same JSON shapes
//! and error envelope. Tokens are `token-{username}`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use snooze_core::{Story, StoryId, Username};

#[derive(Debug)]
struct Account {
    password: String,
    name: String,
    created_at: DateTime<Utc>,
    favorites: Vec<StoryId>,
    stories: Vec<StoryId>,
}

#[derive(Debug, Default)]
struct ApiState {
    accounts: HashMap<String, Account>,
    /// Newest first.
    stories: Vec<Story>,
    deleted: Vec<String>,
    next_story: u32,
}

impl ApiState {
    fn story(&self, story_id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.story_id.as_str() == story_id)
    }

    fn stories_for(&self, ids: &[StoryId]) -> Vec<Value> {
        ids.iter()
            .filter_map(|id| self.story(id.as_str()))
            .map(|story| json!(story))
            .collect()
    }

    fn user_json(&self, username: &str) -> Value {
        self.accounts.get(username).map_or(Value::Null, |account| {
            json!({
                "username": username,
                "name": account.name,
                "createdAt": account.created_at,
                "favorites": self.stories_for(&account.favorites),
                "stories": self.stories_for(&account.stories),
            })
        })
    }
}

/// Fake story API. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeStoryApi {
    state: Arc<Mutex<ApiState>>,
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

impl FakeStoryApi {
    fn state(&self) -> MutexGuard<'_, ApiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an account.
    #[must_use]
    pub fn with_user(self, username: &str, password: &str) -> Self {
        self.state().accounts.insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                name: username.to_uppercase(),
                created_at: timestamp(1_690_000_000),
                favorites: Vec::new(),
                stories: Vec::new(),
            },
        );
        self
    }

    /// Put a story at the top of the feed, posted by `username`.
    #[must_use]
    pub fn with_story(self, story_id: &str, title: &str, username: &str) -> Self {
        {
            let mut state = self.state();
            let posted_at = timestamp(1_700_000_000 + i64::try_from(state.stories.len()).unwrap_or(0));
            state.stories.insert(
                0,
                Story {
                    story_id: StoryId::new(story_id),
                    title: title.to_string(),
                    author: "Ada Lovelace".to_string(),
                    url: format!("https://www.example.com/{story_id}"),
                    username: Username::new(username),
                    created_at: posted_at,
                },
            );
            if let Some(account) = state.accounts.get_mut(username) {
                account.stories.push(StoryId::new(story_id));
            }
        }
        self
    }

    /// Mark a story as a user's favorite.
    #[must_use]
    pub fn with_favorite(self, username: &str, story_id: &str) -> Self {
        if let Some(account) = self.state().accounts.get_mut(username) {
            account.favorites.push(StoryId::new(story_id));
        }
        self
    }

    /// Drop a story from the API, as if deleted elsewhere.
    pub fn remove_story(&self, story_id: &str) {
        let mut state = self.state();
        state.stories.retain(|s| s.story_id.as_str() != story_id);
        for account in state.accounts.values_mut() {
            account.favorites.retain(|id| id.as_str() != story_id);
            account.stories.retain(|id| id.as_str() != story_id);
        }
    }

    /// Story ids passed to `DELETE /stories/{id}`, in call order.
    #[must_use]
    pub fn delete_calls(&self) -> Vec<String> {
        self.state().deleted.clone()
    }

    /// Favorite ids of a user as the API holds them.
    #[must_use]
    pub fn favorites_of(&self, username: &str) -> Vec<String> {
        self.state()
            .accounts
            .get(username)
            .map(|account| account.favorites.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    /// Whether the feed still has a story.
    #[must_use]
    pub fn has_story(&self, story_id: &str) -> bool {
        self.state().story(story_id).is_some()
    }

    /// The API's router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/login", post(login))
            .route("/signup", post(signup))
            .route("/users/{username}", get(get_user))
            .route(
                "/users/{username}/favorites/{story_id}",
                post(add_favorite).delete(remove_favorite),
            )
            .route("/stories", get(list_stories).post(create_story))
            .route("/stories/{story_id}", delete(delete_story))
            .with_state(self.clone())
    }
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Deserialize)]
struct AuthBody {
    user: AuthUser,
}

#[derive(Deserialize)]
struct AuthUser {
    username: String,
    password: String,
    name: Option<String>,
}

#[derive(Deserialize)]
struct TokenBody {
    token: String,
}

#[derive(Deserialize)]
struct FeedQuery {
    skip: Option<usize>,
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct NewStoryBody {
    token: String,
    story: NewStoryFields,
}

#[derive(Deserialize)]
struct NewStoryFields {
    author: String,
    title: String,
    url: String,
}

// =============================================================================
// Handlers
// =============================================================================

fn error(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "error": {
            "status": status.as_u16(),
            "title": status.canonical_reason(),
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

fn token_for(username: &str) -> String {
    format!("token-{username}")
}

/// Username a token belongs to, if the account exists.
fn authorize(state: &ApiState, token: &str) -> Result<String, Response> {
    token
        .strip_prefix("token-")
        .filter(|username| state.accounts.contains_key(*username))
        .map(String::from)
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid token"))
}

async fn login(State(api): State<FakeStoryApi>, Json(body): Json<AuthBody>) -> Response {
    let state = api.state();
    match state.accounts.get(&body.user.username) {
        Some(account) if account.password == body.user.password => Json(json!({
            "token": token_for(&body.user.username),
            "user": state.user_json(&body.user.username),
        }))
        .into_response(),
        _ => error(StatusCode::UNAUTHORIZED, "Invalid password"),
    }
}

async fn signup(State(api): State<FakeStoryApi>, Json(body): Json<AuthBody>) -> Response {
    let mut state = api.state();
    if state.accounts.contains_key(&body.user.username) {
        return error(StatusCode::CONFLICT, "Username already taken");
    }
    state.accounts.insert(
        body.user.username.clone(),
        Account {
            password: body.user.password,
            name: body.user.name.unwrap_or_default(),
            created_at: timestamp(1_710_000_000),
            favorites: Vec::new(),
            stories: Vec::new(),
        },
    );
    (
        StatusCode::CREATED,
        Json(json!({
            "token": token_for(&body.user.username),
            "user": state.user_json(&body.user.username),
        })),
    )
        .into_response()
}

async fn get_user(
    State(api): State<FakeStoryApi>,
    Path(username): Path<String>,
    Query(query): Query<TokenBody>,
) -> Response {
    let state = api.state();
    match authorize(&state, &query.token) {
        Ok(owner) if owner == username => Json(json!({ "user": state.user_json(&username) })).into_response(),
        Ok(_) => error(StatusCode::UNAUTHORIZED, "Token does not match user"),
        Err(response) => response,
    }
}

fn change_favorite(api: &FakeStoryApi, username: &str, story_id: &str, token: &str, add: bool) -> Response {
    let mut state = api.state();
    let owner = match authorize(&state, token) {
        Ok(owner) if owner == username => owner,
        Ok(_) => return error(StatusCode::UNAUTHORIZED, "Token does not match user"),
        Err(response) => return response,
    };
    if state.story(story_id).is_none() {
        return error(StatusCode::NOT_FOUND, "No such story");
    }
    if let Some(account) = state.accounts.get_mut(&owner) {
        account.favorites.retain(|id| id.as_str() != story_id);
        if add {
            account.favorites.push(StoryId::new(story_id));
        }
    }
    let message = if add { "Favorite added!" } else { "Favorite removed!" };
    Json(json!({ "message": message, "user": state.user_json(&owner) })).into_response()
}

async fn add_favorite(
    State(api): State<FakeStoryApi>,
    Path((username, story_id)): Path<(String, String)>,
    Json(body): Json<TokenBody>,
) -> Response {
    change_favorite(&api, &username, &story_id, &body.token, true)
}

async fn remove_favorite(
    State(api): State<FakeStoryApi>,
    Path((username, story_id)): Path<(String, String)>,
    Json(body): Json<TokenBody>,
) -> Response {
    change_favorite(&api, &username, &story_id, &body.token, false)
}

async fn list_stories(State(api): State<FakeStoryApi>, Query(query): Query<FeedQuery>) -> Response {
    let state = api.state();
    let stories: Vec<&Story> = state
        .stories
        .iter()
        .skip(query.skip.unwrap_or(0))
        .take(query.limit.unwrap_or(25))
        .collect();
    Json(json!({ "stories": stories })).into_response()
}

async fn create_story(State(api): State<FakeStoryApi>, Json(body): Json<NewStoryBody>) -> Response {
    let mut state = api.state();
    let owner = match authorize(&state, &body.token) {
        Ok(owner) => owner,
        Err(response) => return response,
    };
    state.next_story += 1;
    let story = Story {
        story_id: StoryId::new(format!("posted-{}", state.next_story)),
        title: body.story.title,
        author: body.story.author,
        url: body.story.url,
        username: Username::new(owner.clone()),
        created_at: timestamp(1_720_000_000),
    };
    state.stories.insert(0, story.clone());
    if let Some(account) = state.accounts.get_mut(&owner) {
        account.stories.push(story.story_id.clone());
    }
    (StatusCode::CREATED, Json(json!({ "story": story }))).into_response()
}

async fn delete_story(
    State(api): State<FakeStoryApi>,
    Path(story_id): Path<String>,
    Json(body): Json<TokenBody>,
) -> Response {
    let mut state = api.state();
    state.deleted.push(story_id.clone());
    let owner = match authorize(&state, &body.token) {
        Ok(owner) => owner,
        Err(response) => return response,
    };
    let Some(story) = state.story(&story_id).cloned() else {
        return error(StatusCode::NOT_FOUND, "No such story");
    };
    if story.username.as_str() != owner {
        return error(StatusCode::FORBIDDEN, "Only the poster can delete a story");
    }
    state.stories.retain(|s| s.story_id.as_str() != story_id);
    for account in state.accounts.values_mut() {
        account.favorites.retain(|id| id.as_str() != story_id);
        account.stories.retain(|id| id.as_str() != story_id);
    }
    Json(json!({ "message": "Deleted story", "story": story })).into_response()
}
