//! Persisted yield cache.
//!
//! Layout: a single flat JSON object `{ "CODE": ytm_percent, ... }`.
//!
//! Features:
//! - Missing file is an empty cache (first run)
//! - Atomic writes (write to .tmp, rename into place)
//! - Quarantine for corrupt files ({filename}.quarantined)
//!
//! Entries never expire; a code keeps its last fetched value until a later
//! successful fetch overwrites it.

use super::provider::DataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when the cache file exists but does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptCachePolicy {
    /// Surface `DataError::CacheCorrupt`.
    Fail,
    /// Move the file aside and start empty.
    #[default]
    Quarantine,
}

/// In-memory yield cache, owned by whoever drives the acquisition run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YieldCache {
    entries: BTreeMap<String, f64>,
}

impl YieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache. A missing file yields an empty cache.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no yield cache yet; starting empty");
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(DataError::CacheIo(format!("read {}: {e}", path.display())));
            }
        };

        serde_json::from_str(&content).map_err(|e| DataError::CacheCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load the cache, applying `policy` if the file is corrupt.
    pub fn load_with_policy(path: &Path, policy: CorruptCachePolicy) -> Result<Self, DataError> {
        match Self::load(path) {
            Err(DataError::CacheCorrupt { path: bad, reason })
                if policy == CorruptCachePolicy::Quarantine =>
            {
                let quarantine = sibling(&bad, "quarantined");
                tracing::warn!(
                    path = %bad.display(),
                    quarantine = %quarantine.display(),
                    %reason,
                    "quarantining corrupt yield cache; starting empty"
                );
                fs::rename(&bad, &quarantine).map_err(|e| {
                    DataError::CacheIo(format!("quarantine {}: {e}", bad.display()))
                })?;
                Ok(Self::new())
            }
            other => other,
        }
    }

    /// Write the full mapping to `path`.
    ///
    /// Writes are atomic: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| DataError::CacheIo(format!("create dir: {e}")))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DataError::CacheIo(format!("serialize: {e}")))?;

        let tmp_path = sibling(path, "tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| DataError::CacheIo(format!("write {}: {e}", tmp_path.display())))?;

        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::CacheIo(format!("atomic rename failed: {e}"))
        })?;

        tracing::debug!(path = %path.display(), entries = self.len(), "yield cache saved");
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.entries.get(code).copied()
    }

    /// Record a freshly fetched yield, returning the value it replaced.
    pub fn insert(&mut self, code: impl Into<String>, ytm: f64) -> Option<f64> {
        self.entries.insert(code.into(), ytm)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<BTreeMap<String, f64>> for YieldCache {
    fn from(entries: BTreeMap<String, f64>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, f64)> for YieldCache {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// `dir/name.ext` -> `dir/name.ext.{suffix}`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> YieldCache {
        [("X1".to_string(), 7.5), ("X1E".to_string(), 6.2)]
            .into_iter()
            .collect()
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = YieldCache::load(&dir.path().join("cache.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        sample().save(&path).unwrap();
        let loaded = YieldCache::load(&path).unwrap();

        assert_eq!(loaded, sample());
        assert!(!sibling(&path, "tmp").exists());
    }

    #[test]
    fn file_is_flat_code_to_number_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        sample().save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"X1": 7.5, "X1E": 6.2}));
    }

    #[test]
    fn full_precision_values_survive_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let cache: YieldCache = [
            ("A".to_string(), 3.5092435806613254),
            ("B".to_string(), 7.123456789012345),
            ("C".to_string(), 0.1 + 0.2),
        ]
        .into_iter()
        .collect();

        cache.save(&path).unwrap();
        let loaded = YieldCache::load(&path).unwrap();

        for (code, ytm) in cache.iter() {
            assert_eq!(loaded.get(code).map(f64::to_bits), Some(ytm.to_bits()), "{code}");
        }
    }

    #[test]
    fn reads_integer_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"X1": 7}"#).unwrap();
        assert_eq!(YieldCache::load(&path).unwrap().get("X1"), Some(7.0));
    }

    #[test]
    fn corrupt_file_fails_under_fail_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{not json").unwrap();

        let result = YieldCache::load_with_policy(&path, CorruptCachePolicy::Fail);
        assert!(matches!(result, Err(DataError::CacheCorrupt { .. })));
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_quarantined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let cache = YieldCache::load_with_policy(&path, CorruptCachePolicy::Quarantine).unwrap();
        assert!(cache.is_empty());
        assert!(!path.exists());
        assert!(dir.path().join("cache.json.quarantined").exists());
    }

    #[test]
    fn insert_overwrites_and_reports_previous() {
        let mut cache = sample();
        assert_eq!(cache.insert("X1", 7.9), Some(7.5));
        assert_eq!(cache.get("X1"), Some(7.9));
        assert_eq!(cache.insert("NEW", 5.0), None);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/cache.json");
        sample().save(&path).unwrap();
        assert_eq!(YieldCache::load(&path).unwrap(), sample());
    }
}
