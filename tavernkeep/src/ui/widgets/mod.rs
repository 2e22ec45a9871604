//! Widgets for the Tavernkeep TUI

mod character_panel;
mod chat;
mod companions;
mod dice_overlay;
mod input;
mod status_bar;
mod xp_bar;

pub use character_panel::CharacterPanelWidget;
pub use chat::ChatWidget;
pub use companions::CompanionsWidget;
pub use dice_overlay::DiceOverlayWidget;
pub use input::InputWidget;
pub use status_bar::StatusBarWidget;
pub use xp_bar::XpBarWidget;
