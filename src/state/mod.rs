//! State management module
//!
//! Handles bookmark tracking and persistence between sync runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Singer bookmark document
//! - `StateManager` - Shared, optionally file-backed state with atomic saves

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{compare_cursor_values, Bookmark, State};

#[cfg(test)]
mod manager_tests;
