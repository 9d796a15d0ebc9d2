//! Ratatui widgets for the trawl TUI.

pub mod candidate_list;
pub mod help;
pub mod search_bar;
