//! Column visibility preferences
//!
//! Which columns are shown is a per-user preference persisted as a single
//! JSON blob keyed by status code string, e.g. `{"10":true,"20":false}`.
//! `resolve_visibility` is the pure merge of a stored blob with the board's
//! current columns; the `PreferenceStore` trait is the persistence seam.

use crate::board::ColumnToggle;
use crate::error::Result;
use crate::types::StatusCode;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Storage key for the visibility blob
pub const PREFERENCE_KEY: &str = "kanban-column-preferences";

/// Visibility per status column
pub type VisibilityMap = BTreeMap<StatusCode, bool>;

/// Merge stored preferences with the current columns. A stored entry wins;
/// a column with no stored entry defaults to visible when it is in the
/// default-visible set or currently has cards.
pub fn resolve_visibility(stored: Option<&VisibilityMap>, columns: &[ColumnToggle]) -> VisibilityMap {
    columns
        .iter()
        .map(|column| {
            let visible = stored
                .and_then(|map| map.get(&column.status).copied())
                .unwrap_or(column.default_visible || column.count >= 1);
            (column.status, visible)
        })
        .collect()
}

/// One-key string storage for the preference blob.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Decode a stored blob. Corrupt JSON degrades to "nothing stored" so the
/// board falls back to first-visit defaults instead of failing to render.
pub fn decode_preferences(raw: &str) -> Option<VisibilityMap> {
    match serde_json::from_str::<BTreeMap<String, bool>>(raw) {
        Ok(map) => Some(
            map.into_iter()
                .filter_map(|(code, visible)| {
                    code.parse::<u32>().ok().map(|c| (StatusCode::new(c), visible))
                })
                .collect(),
        ),
        Err(error) => {
            tracing::warn!(%error, "discarding corrupt column preferences");
            None
        }
    }
}

/// Encode a visibility map into the stored blob format.
pub fn encode_preferences(map: &VisibilityMap) -> Result<String> {
    let wire: BTreeMap<String, bool> = map
        .iter()
        .map(|(status, visible)| (status.value().to_string(), *visible))
        .collect();
    Ok(serde_json::to_string(&wire)?)
}

/// In-memory preference store, used in tests and as the default when the
/// host provides no persistence.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed preference store: each key is one file under a directory.
#[derive(Debug)]
pub struct FilePreferenceStore {
    directory: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.directory)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}
