//! Selection capture and the floating selection toolbar.

pub mod capture;
pub mod toolbar;

pub use capture::SelectionCapture;
pub use toolbar::{ToolbarAction, ToolbarAnchor, toolbar_anchor};
