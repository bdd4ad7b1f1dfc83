//! Viewer session
//!
//! This module contains:
//! - Message types for viewer gestures
//! - The viewer state (transform engine, selection, viewport)
//! - Message handlers

pub mod handlers;
pub mod messages;
pub mod state;

pub use messages::{Change, ViewerMsg};
pub use state::{Viewer, ViewerOptions};
