//! Minimal client for the Tavernkeep game-master backend API.
//!
//! This crate provides a focused client for the companion backend with:
//! - Account authentication (login/register) with bearer tokens
//! - Character CRUD
//! - The game-master dialogue endpoints (start, action, dice result, NPC turn)
//!
//! The backend owns all persistence and the language-model integration;
//! this client only speaks the HTTP contract.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Not authenticated")]
    NoToken,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Backend API client.
///
/// Holds the bearer token for authenticated calls in memory. A 401 on any
/// authenticated call drops the token and surfaces [`Error::SessionExpired`];
/// clearing any *stored* copy of the token is the caller's responsibility.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Client {
    /// Create a new client against the given base URL (e.g. `http://host/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Create a client from the `GAMEMASTER_URL` environment variable,
    /// falling back to `http://localhost:8080/api`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("GAMEMASTER_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Set the bearer token for authenticated calls.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replace the bearer token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the bearer token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a bearer token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Log in and store the returned bearer token on this client.
    ///
    /// A 401-class response maps to [`Error::InvalidCredentials`] rather than
    /// session expiry, since no session exists yet.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<String, Error> {
        let body = LoginRequest { username, password };
        let response = self
            .http
            .post(format!("{}/login_check", self.base_url))
            .headers(self.base_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(read_api_error(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        self.token = Some(token.token.clone());
        Ok(token.token)
    }

    /// Register a new account. The success payload is opaque to the client.
    pub async fn register(&self, email: &str, password: &str) -> Result<serde_json::Value, Error> {
        let body = RegisterRequest { email, password };
        let response = self
            .http
            .post(format!("{}/register", self.base_url))
            .headers(self.base_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(read_api_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }

    // ========================================================================
    // Character CRUD
    // ========================================================================

    /// Fetch all characters belonging to the authenticated account.
    pub async fn list_characters(&mut self) -> Result<Vec<CharacterRecord>, Error> {
        self.request_json(reqwest::Method::GET, "/characters", None::<&()>)
            .await
    }

    /// Fetch a single character by id.
    pub async fn get_character(&mut self, id: i64) -> Result<CharacterRecord, Error> {
        self.request_json(reqwest::Method::GET, &format!("/characters/{id}"), None::<&()>)
            .await
    }

    /// Create a character and return the stored record (with its server id).
    pub async fn create_character(
        &mut self,
        character: &CharacterRecord,
    ) -> Result<CharacterRecord, Error> {
        self.request_json(reqwest::Method::POST, "/characters", Some(character))
            .await
    }

    /// Update an existing character.
    pub async fn update_character(
        &mut self,
        id: i64,
        character: &CharacterRecord,
    ) -> Result<CharacterRecord, Error> {
        self.request_json(
            reqwest::Method::PUT,
            &format!("/characters/{id}"),
            Some(character),
        )
        .await
    }

    /// Delete a character.
    pub async fn delete_character(&mut self, id: i64) -> Result<(), Error> {
        let response = self
            .send_authed(reqwest::Method::DELETE, &format!("/characters/{id}"), None::<&()>)
            .await?;
        if !response.status().is_success() {
            return Err(read_api_error(response).await);
        }
        Ok(())
    }

    // ========================================================================
    // Game-master dialogue
    // ========================================================================

    /// Open a game session; returns the introduction and companion roster.
    pub async fn start_game(&mut self, request: &StartGameRequest) -> Result<GameOpening, Error> {
        self.request_json(reqwest::Method::POST, "/game/start", Some(request))
            .await
    }

    /// Send a player action and return the game master's narrative reply.
    pub async fn send_action(&mut self, request: &ActionRequest) -> Result<String, Error> {
        let reply: GmResponse = self
            .request_json(reqwest::Method::POST, "/game/action", Some(request))
            .await?;
        Ok(reply.response)
    }

    /// Report a resolved dice roll and return the game master's reply.
    pub async fn send_dice_result(
        &mut self,
        request: &DiceResultRequest,
    ) -> Result<String, Error> {
        let reply: GmResponse = self
            .request_json(reqwest::Method::POST, "/game/dice-result", Some(request))
            .await?;
        Ok(reply.response)
    }

    /// Ask the backend to play out an NPC's turn.
    pub async fn npc_action(&mut self, request: &NpcActionRequest) -> Result<NpcReply, Error> {
        self.request_json(reqwest::Method::POST, "/game/npc-action", Some(request))
            .await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn base_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn auth_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = self.base_headers()?;
        let token = self.token.as_deref().ok_or(Error::NoToken)?;
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| Error::Config(format!("Invalid token: {e}")))?,
        );
        Ok(headers)
    }

    async fn send_authed<B: Serialize>(
        &mut self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, Error> {
        let headers = self.auth_headers()?;
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if response.status().as_u16() == 401 {
            // Token expired or invalid: drop it so callers re-authenticate.
            tracing::warn!(path, "401 from backend, dropping bearer token");
            self.token = None;
            return Err(Error::SessionExpired);
        }

        Ok(response)
    }

    async fn request_json<B: Serialize, T: DeserializeOwned>(
        &mut self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, Error> {
        let response = self.send_authed(method, path, body).await?;

        if !response.status().is_success() {
            return Err(read_api_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }
}

/// Extract the server-supplied `message` from a non-2xx response, falling
/// back to the raw body when it isn't the standard error shape.
async fn read_api_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or(body);
    Error::Api { status, message }
}

// ============================================================================
// Public types
// ============================================================================

/// The six ability scores as the backend stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub strength: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub dexterity: u8,
    pub charisma: u8,
}

/// A character record as exchanged with `/characters`.
///
/// `id` is server-assigned and absent on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub race: String,
    pub class: String,
    #[serde(default)]
    pub players: u8,
    #[serde(rename = "lvl")]
    pub level: u8,
    #[serde(rename = "statistic")]
    pub stats: Statistics,
}

/// A companion profile delivered with the game opening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcProfile {
    pub name: String,
    pub race: String,
    pub class: String,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub xp: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
}

fn default_level() -> u8 {
    1
}

/// Who said a line in the session transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Player,
    Gm,
    Npc,
    System,
}

/// One line of the session transcript, sent as `history` with every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    /// A player line.
    pub fn player(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Player,
            text: text.into(),
        }
    }

    /// A game-master line.
    pub fn gm(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Gm,
            text: text.into(),
        }
    }

    /// An NPC line.
    pub fn npc(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Npc,
            text: text.into(),
        }
    }
}

/// Request body for `/game/start`.
#[derive(Debug, Clone, Serialize)]
pub struct StartGameRequest {
    pub character: CharacterRecord,
    pub players: u8,
    pub setting: String,
}

/// Response from `/game/start`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOpening {
    pub session_id: String,
    pub introduction: String,
    #[serde(default)]
    pub npcs: Vec<NpcProfile>,
}

/// Request body for `/game/action`.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRequest {
    pub character: CharacterRecord,
    pub action: String,
    pub context: String,
    pub history: Vec<ChatTurn>,
}

/// A resolved dice roll as reported to `/game/dice-result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollReport {
    #[serde(rename = "type")]
    pub die: String,
    pub result: i32,
    pub modifier: i32,
    pub total: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_check: Option<String>,
}

/// Request body for `/game/dice-result`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceResultRequest {
    pub character: CharacterRecord,
    pub dice_roll: DiceRollReport,
    pub context: String,
    pub history: Vec<ChatTurn>,
}

/// Request body for `/game/npc-action`.
#[derive(Debug, Clone, Serialize)]
pub struct NpcActionRequest {
    pub npc: NpcProfile,
    pub situation: String,
    pub history: Vec<ChatTurn>,
}

/// Response from `/game/npc-action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcReply {
    pub npc_response: String,
    pub npc_name: String,
}

// ============================================================================
// Internal API types
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct GmResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
