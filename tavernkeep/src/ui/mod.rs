//! UI module for the Tavernkeep TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;

pub use render::FocusedPanel;
