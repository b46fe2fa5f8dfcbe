//! The Pagemark coordinator - subsystem state and logic.
//!
//! This module is organized into several submodules:
//! - `state` - The Pagemark struct definition and sub-structs
//! - `lifecycle` - Attachment, per-frame polling, and teardown
//! - `selection_handlers` - Toolbar actions, note flow, clipboard, commits
//! - `mutations` - Menu-driven color/note/delete and pointer dispatch

mod lifecycle;
mod mutations;
mod selection_handlers;
mod state;

pub use state::{OverlayState, Pagemark, SelectionState, SyncState};
