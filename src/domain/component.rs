//! Component metadata shown in the info panel

use std::collections::HashMap;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Descriptive metadata for one electrical part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    /// Short reference designator (e.g. `U1`), unique key
    pub reference: String,
    /// Part value or number as printed on the schematic
    pub value: String,
    pub title: String,
    pub description: String,
    /// Ordered specification bullets
    #[serde(default)]
    pub specs: Vec<String>,
}

/// Reference-keyed lookup over component metadata, keeping authoring order
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    entries: Vec<ComponentInfo>,
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Build a registry, rejecting empty or duplicate references
    pub fn new(entries: Vec<ComponentInfo>) -> anyhow::Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, info) in entries.iter().enumerate() {
            if info.reference.trim().is_empty() {
                bail!("component #{i} has an empty reference");
            }
            if index.insert(info.reference.clone(), i).is_some() {
                bail!("duplicate component reference {:?}", info.reference);
            }
        }
        Ok(Self { entries, index })
    }

    /// Look up a component by reference
    pub fn get(&self, reference: &str) -> Option<&ComponentInfo> {
        self.index.get(reference).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.index.contains_key(reference)
    }

    /// Entries in authoring order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
