//! Gesture scripts: a JSON array of viewer messages replayed in order

use std::fmt;
use std::path::Path;

use anyhow::Context;

use crate::session::{Change, Viewer, ViewerMsg};

/// What a replay changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub messages: usize,
    pub view_changes: usize,
    pub selection_changes: usize,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Replayed {} messages ({} view, {} selection changes)",
            self.messages, self.view_changes, self.selection_changes
        )
    }
}

pub fn parse(json: &str) -> anyhow::Result<Vec<ViewerMsg>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load(path: &Path) -> anyhow::Result<Vec<ViewerMsg>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    parse(&json).with_context(|| format!("Failed to parse script: {}", path.display()))
}

/// Apply messages to the viewer in order
pub fn replay(viewer: &mut Viewer, messages: Vec<ViewerMsg>) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for msg in messages {
        summary.messages += 1;
        match viewer.update(msg) {
            Change::View => summary.view_changes += 1,
            Change::Selection => summary.selection_changes += 1,
            Change::None => {}
        }
    }
    log::debug!("{summary}");
    summary
}
