//! Game-master session driver.
//!
//! Wraps the backend client with the conversational state the dialogue
//! endpoints expect: the session id from `/game/start`, the rolling
//! transcript (sent as `history` with every call), and the current
//! narrative context (the game master's last reply). The driver performs
//! no retries and no cancellation; callers serialize access to it.

use crate::character::{Character, Companion};
use crate::dice::DiceRoll;
use gamemaster::{
    ActionRequest, ChatTurn, Client, DiceResultRequest, Error, NpcActionRequest, NpcReply,
    StartGameRequest,
};

/// Configuration for a game session.
#[derive(Debug, Clone)]
pub struct GmConfig {
    /// The campaign setting sent with `/game/start`.
    pub setting: String,

    /// Number of players at the table (4-6 in the character form).
    pub players: u8,
}

impl Default for GmConfig {
    fn default() -> Self {
        Self {
            setting: "The cursed depths of Blackstone Keep".to_string(),
            players: 4,
        }
    }
}

/// The opening of a game session.
#[derive(Debug, Clone)]
pub struct Opening {
    /// The game master's introduction.
    pub introduction: String,

    /// The companion roster for [`crate::Action::SetCompanions`].
    pub companions: Vec<Companion>,
}

/// Driver for the chat-driven game-master loop.
pub struct GameMaster {
    client: Client,
    config: GmConfig,
    session_id: Option<String>,
    history: Vec<ChatTurn>,
    context: String,
}

impl GameMaster {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            config: GmConfig::default(),
            session_id: None,
            history: Vec::new(),
            context: String::new(),
        }
    }

    pub fn with_config(mut self, config: GmConfig) -> Self {
        self.config = config;
        self
    }

    /// The session id returned by the backend, once a game has started.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// The transcript so far.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// The narrative context the next roll or action resolves against.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Access to the underlying client (e.g. to check auth state).
    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Start a game session for the character.
    pub async fn start(&mut self, character: &Character) -> Result<Opening, Error> {
        let request = StartGameRequest {
            character: character.to_record(self.config.players),
            players: self.config.players,
            setting: self.config.setting.clone(),
        };
        let opening = self.client.start_game(&request).await?;

        self.session_id = Some(opening.session_id);
        self.context = opening.introduction.clone();
        self.history = vec![ChatTurn::gm(&opening.introduction)];

        Ok(Opening {
            introduction: opening.introduction,
            companions: opening
                .npcs
                .into_iter()
                .map(Companion::from_profile)
                .collect(),
        })
    }

    /// Send a player action and return the game master's reply.
    pub async fn player_action(
        &mut self,
        character: &Character,
        action: &str,
    ) -> Result<String, Error> {
        self.history.push(ChatTurn::player(action));

        let request = ActionRequest {
            character: character.to_record(self.config.players),
            action: action.to_string(),
            context: self.context.clone(),
            history: self.history.clone(),
        };
        let reply = self.client.send_action(&request).await?;

        self.push_gm_reply(&reply);
        Ok(reply)
    }

    /// Report a resolved dice roll.
    ///
    /// `check` is the narrative context the roll was pending against (as
    /// consumed from the session state); when absent the current context
    /// is used.
    pub async fn dice_result(
        &mut self,
        character: &Character,
        roll: &DiceRoll,
        check: Option<String>,
    ) -> Result<String, Error> {
        self.history.push(ChatTurn {
            speaker: gamemaster::Speaker::System,
            text: format!("{} rolls {roll}", character.name),
        });

        let request = DiceResultRequest {
            character: character.to_record(self.config.players),
            dice_roll: roll.report(),
            context: check.unwrap_or_else(|| self.context.clone()),
            history: self.history.clone(),
        };
        let reply = self.client.send_dice_result(&request).await?;

        self.push_gm_reply(&reply);
        Ok(reply)
    }

    /// Let a companion act in the current situation.
    pub async fn npc_action(
        &mut self,
        companion: &Companion,
        situation: &str,
    ) -> Result<NpcReply, Error> {
        let request = NpcActionRequest {
            npc: companion.to_profile(),
            situation: situation.to_string(),
            history: self.history.clone(),
        };
        let reply = self.client.npc_action(&request).await?;

        self.history.push(ChatTurn::npc(format!(
            "{}: {}",
            reply.npc_name, reply.npc_response
        )));
        Ok(reply)
    }

    /// Drop all session state, keeping the client and its token.
    pub fn reset(&mut self) {
        self.session_id = None;
        self.history.clear();
        self.context.clear();
    }

    fn push_gm_reply(&mut self, reply: &str) {
        self.history.push(ChatTurn::gm(reply));
        self.context = reply.to_string();
    }
}
