use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to state.json in the config directory).
///
/// Collapse entries are keyed by todo id, which is positional; after external
/// edits they may drift. Stale entries are pruned on reload, so this is a
/// best-effort convenience, not a source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    #[serde(default)]
    pub cursor: usize,
    /// Ids of collapsed nodes
    #[serde(default)]
    pub collapsed: HashSet<usize>,
}

/// Read state.json from the given directory
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join("state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write state.json to the given directory
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join("state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
