//! Location to nearby-facility lookup

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FacilityFileError {
    #[error("failed to read facility file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse facility file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Static table from normalized location name to facility names
#[derive(Debug, Clone, Default)]
pub struct FacilityDirectory {
    entries: HashMap<String, Vec<String>>,
}

impl FacilityDirectory {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (normalize(k.as_ref()), v.into_iter().map(Into::into).collect()))
            .collect();
        Self { entries }
    }

    /// Built-in table
    pub fn builtin() -> Self {
        Self::new([
            ("noida", vec!["Jaypee Hospital", "Fortis Hospital"]),
            ("greater noida", vec!["Yatharth Hospital", "Sharda Hospital"]),
            ("delhi", vec!["AIIMS", "Sir Ganga Ram Hospital"]),
        ])
    }

    /// Load a `{"city": ["facility", ...]}` JSON object
    pub fn from_json_file(path: &Path) -> Result<Self, FacilityFileError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| FacilityFileError::Read {
            path: display.clone(),
            source,
        })?;
        let table: HashMap<String, Vec<String>> =
            serde_json::from_str(&raw).map_err(|source| FacilityFileError::Parse {
                path: display,
                source,
            })?;
        Ok(Self::new(table))
    }

    /// Facilities for a location; unknown locations yield an empty list
    pub fn lookup(&self, location: &str) -> Vec<String> {
        self.entries
            .get(&normalize(location))
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn normalize(location: &str) -> String {
    location.trim().to_lowercase()
}
