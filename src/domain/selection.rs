//! Single-component selection
//!
//! Two states: nothing selected (`Idle`) or one registry entry shown.
//! Selecting the shown component again toggles back to idle.

use super::component::{ComponentInfo, ComponentRegistry};

/// Which component's info panel is open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Showing(String),
}

impl Selection {
    /// Toggle selection of `id`. Ids missing from the registry are ignored.
    /// Returns true if the state changed.
    pub fn select(&mut self, id: &str, registry: &ComponentRegistry) -> bool {
        if !registry.contains(id) {
            log::debug!("ignoring selection of {id:?}: no component info");
            return false;
        }
        *self = if self.is_selected(id) {
            Selection::Idle
        } else {
            Selection::Showing(id.to_string())
        };
        true
    }

    /// Close the info panel. Returns true if something was selected.
    pub fn clear(&mut self) -> bool {
        !matches!(std::mem::take(self), Selection::Idle)
    }

    pub fn selected_id(&self) -> Option<&str> {
        match self {
            Selection::Idle => None,
            Selection::Showing(id) => Some(id),
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id() == Some(id)
    }

    /// Registry entry of the selected component
    pub fn current<'a>(&self, registry: &'a ComponentRegistry) -> Option<&'a ComponentInfo> {
        self.selected_id().and_then(|id| registry.get(id))
    }
}
