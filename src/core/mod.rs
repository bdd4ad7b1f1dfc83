//! Command-line host
//!
//! This module contains:
//! - Argument parsing (clap)
//! - Command dispatch
//! - Gesture script loading and replay
//! - Export of rendered scenes to disk

pub mod app;
pub mod cli;
pub mod export;
pub mod script;
