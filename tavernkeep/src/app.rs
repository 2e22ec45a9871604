//! Main application state and logic

use gamemaster::CharacterRecord;
use tavernkeep_core::dice::{roll_with_rng, DieType};
use tavernkeep_core::{ClientStore, CompanionId, DiceRoll, GameMaster, SessionState};

use crate::demo::DemoGameMaster;
use crate::forms::{AuthForm, CharacterForm};
use crate::ui::theme::AppTheme;
use crate::ui::FocusedPanel;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Register,
    Board,
    CharacterForm,
    Game,
}

/// Input modes on the game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation and hotkeys.
    #[default]
    Normal,
    /// Free text input for the chat box.
    Insert,
}

/// Who said a chat line, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    GameMaster,
    Narrator,
    System,
    Player,
    Npc,
}

/// One line in the chat transcript.
#[derive(Debug, Clone)]
pub struct ChatItem {
    pub author: String,
    pub kind: ChatKind,
    pub text: String,
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

/// A transient user-facing notice.
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

/// State for a d20 roll in progress (for animation).
#[derive(Debug, Clone)]
pub struct RollingD20 {
    /// Number of animation frames elapsed.
    pub frames_elapsed: u8,
    /// The face currently flashing by.
    pub display_value: u8,
    /// The settled result, once the animation finishes.
    pub result: Option<u8>,
}

/// An operation to run against the network between renders.
///
/// Exactly one is in flight at a time; the `busy` flag blocks duplicate
/// submissions while it runs.
#[derive(Debug, Clone)]
pub enum PendingOp {
    Login { username: String, password: String },
    Register { email: String, password: String },
    LoadRoster,
    SaveCharacter { record: CharacterRecord, editing: Option<i64> },
    DeleteCharacter(i64),
    StartGame,
    PlayerAction(String),
    DiceResult { roll: DiceRoll, check: Option<String> },
    CompanionAction { id: CompanionId },
    Logout,
}

/// The game-master driver: the real backend or the offline demo.
pub enum GmDriver {
    Remote(GameMaster),
    Demo(DemoGameMaster),
}

/// Main application state
pub struct App {
    // Collaborators
    pub client: gamemaster::Client,
    pub store: ClientStore,
    pub gm: GmDriver,

    // Session
    pub session: SessionState,
    pub screen: Screen,
    pub offline: bool,

    // Screen state
    pub auth: AuthForm,
    pub form: CharacterForm,
    pub roster: Vec<CharacterRecord>,
    pub roster_index: usize,

    // Chat
    pub chat: Vec<ChatItem>,
    pub chat_scroll: usize,
    pub scroll_locked_to_bottom: bool,
    /// Round-robin cursor for the "companion acts" hotkey.
    pub companion_turn: usize,

    // Input
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,

    // UI
    pub theme: AppTheme,
    pub focused_panel: FocusedPanel,
    pub flash: Option<Flash>,
    pub rolling: Option<RollingD20>,
    pub animation_frame: u8,

    // Control
    pub busy: bool,
    pub pending: Option<PendingOp>,
    pub should_quit: bool,
}

impl App {
    pub fn new(client: gamemaster::Client, store: ClientStore, gm: GmDriver, offline: bool) -> Self {
        let screen = if offline || client.is_authenticated() {
            Screen::Board
        } else {
            Screen::Login
        };

        Self {
            client,
            store,
            gm,
            session: SessionState::new(),
            screen,
            offline,
            auth: AuthForm::default(),
            form: CharacterForm::default(),
            roster: Vec::new(),
            roster_index: 0,
            chat: Vec::new(),
            chat_scroll: 0,
            scroll_locked_to_bottom: true,
            companion_turn: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            theme: AppTheme::default(),
            focused_panel: FocusedPanel::default(),
            flash: None,
            rolling: None,
            animation_frame: 0,
            busy: false,
            pending: None,
            should_quit: false,
        }
    }

    /// Queue a network operation unless one is already in flight.
    pub fn queue(&mut self, op: PendingOp) {
        if self.busy {
            self.flash_info("Please wait...");
            return;
        }
        self.busy = true;
        self.pending = Some(op);
    }

    // =========================================================================
    // Chat transcript
    // =========================================================================

    /// Add a chat line.
    pub fn add_chat(&mut self, author: impl Into<String>, kind: ChatKind, text: impl Into<String>) {
        self.chat.push(ChatItem {
            author: author.into(),
            kind,
            text: text.into(),
        });
        if self.scroll_locked_to_bottom {
            self.scroll_to_bottom();
        }
    }

    /// Add a system line attributed to nobody in particular.
    pub fn add_system(&mut self, text: impl Into<String>) {
        self.add_chat("System", ChatKind::System, text);
    }

    pub fn scroll_to_bottom(&mut self) {
        // The widget caps this to the actual max scroll.
        self.chat_scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    /// Conservative line estimate for capping manual scrolling.
    fn estimate_max_scroll(&self) -> usize {
        const ESTIMATED_WIDTH: usize = 60;
        const ESTIMATED_VISIBLE_HEIGHT: usize = 20;

        let estimated_lines: usize = self
            .chat
            .iter()
            .map(|item| (item.text.len() / ESTIMATED_WIDTH).max(1) + 1)
            .sum();
        estimated_lines.saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        if self.chat_scroll > max_scroll {
            self.chat_scroll = max_scroll;
        }
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.scroll_locked_to_bottom = false;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max_scroll + 100);
    }

    // =========================================================================
    // Input buffer (unicode-safe)
    // =========================================================================

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Take the input buffer if non-empty.
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.trim().is_empty() {
            return None;
        }
        self.cursor_position = 0;
        Some(std::mem::take(&mut self.input_buffer))
    }

    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    // =========================================================================
    // Dice animation
    // =========================================================================

    /// Begin the d20 rolling animation. The result settles in `tick`.
    pub fn start_roll(&mut self) {
        if self.rolling.is_some() {
            return;
        }
        self.rolling = Some(RollingD20 {
            frames_elapsed: 0,
            display_value: 20,
            result: None,
        });
    }

    /// Advance animations; returns a settled d20 value exactly once per roll.
    pub fn tick(&mut self) -> Option<u8> {
        self.animation_frame = self.animation_frame.wrapping_add(1);

        let rolling = self.rolling.as_mut()?;
        rolling.frames_elapsed += 1;

        if rolling.result.is_none() {
            let mut rng = rand::thread_rng();
            rolling.display_value = roll_with_rng(DieType::D20, &mut rng) as u8;

            // ~15 frames of tumbling (at the 100ms poll timeout), then settle.
            if rolling.frames_elapsed >= 15 {
                let value = roll_with_rng(DieType::D20, &mut rng) as u8;
                rolling.display_value = value;
                rolling.result = Some(value);
                return Some(value);
            }
        }
        None
    }

    /// The settled roll shown in the overlay, if any.
    pub fn settled_roll(&self) -> Option<u8> {
        self.rolling.as_ref().and_then(|r| r.result)
    }

    /// Dismiss the dice overlay.
    pub fn close_roll(&mut self) {
        self.rolling = None;
    }

    // =========================================================================
    // Flash messages
    // =========================================================================

    pub fn flash_info(&mut self, text: impl Into<String>) {
        self.flash = Some(Flash {
            kind: FlashKind::Info,
            text: text.into(),
        });
    }

    pub fn flash_error(&mut self, text: impl Into<String>) {
        self.flash = Some(Flash {
            kind: FlashKind::Error,
            text: text.into(),
        });
    }

    pub fn clear_flash(&mut self) {
        self.flash = None;
    }

    // =========================================================================
    // Roster
    // =========================================================================

    /// The record under the cursor on the board.
    pub fn selected_record(&self) -> Option<&CharacterRecord> {
        self.roster.get(self.roster_index)
    }

    pub fn roster_up(&mut self) {
        self.roster_index = self.roster_index.saturating_sub(1);
    }

    pub fn roster_down(&mut self) {
        if !self.roster.is_empty() {
            self.roster_index = (self.roster_index + 1).min(self.roster.len() - 1);
        }
    }

    /// The next companion to act, round-robin over the roster.
    pub fn next_companion(&mut self) -> Option<CompanionId> {
        let companions = self.session.companions();
        if companions.is_empty() {
            return None;
        }
        let id = companions[self.companion_turn % companions.len()].id;
        self.companion_turn += 1;
        Some(id)
    }

    /// Cycle focus between the game screen panels.
    pub fn cycle_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Chat => FocusedPanel::Character,
            FocusedPanel::Character => FocusedPanel::Companions,
            FocusedPanel::Companions => FocusedPanel::Chat,
        };
    }
}
