//! Terminal User Interface components for chartpad.

pub mod chart;
pub mod editor;
mod help;
pub mod saved;
pub mod theme;
pub mod widgets;

pub use help::HelpOverlay;
pub use theme::Theme;
