//! JSON schematic files

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::Schematic;
use crate::domain::{ComponentInfo, LayoutShape, NetLabel, PinLabel, Wire};

/// On-disk form of a schematic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicFile {
    pub name: String,
    pub components: Vec<ComponentInfo>,
    pub shapes: Vec<LayoutShape>,
    #[serde(default)]
    pub wires: Vec<Wire>,
    #[serde(default)]
    pub net_labels: Vec<NetLabel>,
    #[serde(default)]
    pub pins: Vec<PinLabel>,
}

impl SchematicFile {
    /// Validate into a usable schematic
    pub fn into_schematic(self) -> anyhow::Result<Schematic> {
        Schematic::new(
            self.name,
            self.components,
            self.shapes,
            self.wires,
            self.net_labels,
            self.pins,
        )
    }
}

impl From<&Schematic> for SchematicFile {
    fn from(s: &Schematic) -> Self {
        Self {
            name: s.name().to_string(),
            components: s.registry().iter().cloned().collect(),
            shapes: s.shapes().to_vec(),
            wires: s.wires().to_vec(),
            net_labels: s.net_labels().to_vec(),
            pins: s.pins().to_vec(),
        }
    }
}

/// Load and validate a schematic from a JSON file
pub fn load(path: &Path) -> anyhow::Result<Schematic> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schematic: {}", path.display()))?;
    let file: SchematicFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse schematic: {}", path.display()))?;
    let schematic = file
        .into_schematic()
        .with_context(|| format!("Invalid schematic: {}", path.display()))?;
    log::debug!(
        "Loaded schematic {:?}: {} shapes, {} wires, {} components",
        schematic.name(),
        schematic.shapes().len(),
        schematic.wires().len(),
        schematic.registry().len()
    );
    Ok(schematic)
}

/// Serialize a schematic as pretty JSON
pub fn to_json(schematic: &Schematic) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&SchematicFile::from(schematic))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schematic::builtin;
    use std::io::Write;

    #[test]
    fn test_builtin_survives_json() {
        let schematic = builtin::foc_driver().unwrap();
        let json = to_json(&schematic).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = load(file.path()).unwrap();
        assert_eq!(SchematicFile::from(&loaded), SchematicFile::from(&schematic));
    }

    #[test]
    fn test_load_reports_invalid_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"name": "x", "components": [], "shapes": [
                {{"id": "U1", "x": 0, "y": 0, "width": 10, "height": 10,
                  "color": "#0891b2", "kind": "ic", "label_ref": "U1"}}
            ]}}"##
        )
        .unwrap();
        let err = load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("no component info"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read schematic"));
    }
}
