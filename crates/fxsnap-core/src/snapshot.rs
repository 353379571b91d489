//! Snapshot artifact and its atomic writer.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tempfile::NamedTempFile;

use crate::domain::UtcDateTime;
use crate::error::SnapshotError;

/// Provenance tag used when no live value made it into a snapshot.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Point-in-time artifact: one value per symbol plus provenance metadata.
///
/// Serialized as `{<domain_key>: {...}, asOf?, fetchedAt, source, fallbackUsed?, errors?, scrapeError?}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<K, V> {
    domain_key: &'static str,
    pub values: BTreeMap<K, V>,
    pub as_of: Option<String>,
    pub fetched_at: UtcDateTime,
    pub source: String,
    pub fallback_used: Option<Vec<K>>,
    pub errors: BTreeMap<K, String>,
    pub scrape_error: Option<String>,
}

impl<K: Ord, V> Snapshot<K, V> {
    pub fn new(
        domain_key: &'static str,
        values: BTreeMap<K, V>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            domain_key,
            values,
            as_of: None,
            fetched_at: UtcDateTime::now(),
            source: source.into(),
            fallback_used: None,
            errors: BTreeMap::new(),
            scrape_error: None,
        }
    }

    pub fn domain_key(&self) -> &'static str {
        self.domain_key
    }

    pub fn with_as_of(mut self, as_of: Option<String>) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn with_fallback_used(mut self, keys: Vec<K>) -> Self {
        self.fallback_used = Some(keys);
        self
    }

    pub fn with_errors(mut self, errors: BTreeMap<K, String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_scrape_error(mut self, error: impl Into<String>) -> Self {
        self.scrape_error = Some(error.into());
        self
    }
}

impl<K: Serialize, V: Serialize> Serialize for Snapshot<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.domain_key, &self.values)?;
        if let Some(as_of) = &self.as_of {
            map.serialize_entry("asOf", as_of)?;
        }
        map.serialize_entry("fetchedAt", &self.fetched_at)?;
        map.serialize_entry("source", &self.source)?;
        if let Some(fallback_used) = &self.fallback_used {
            map.serialize_entry("fallbackUsed", fallback_used)?;
        }
        if !self.errors.is_empty() {
            map.serialize_entry("errors", &self.errors)?;
        }
        if let Some(scrape_error) = &self.scrape_error {
            map.serialize_entry("scrapeError", scrape_error)?;
        }
        map.end()
    }
}

/// Writes snapshots so a reader sees either the previous file or the complete new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a previous artifact is on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Serializes first, then writes a sibling temp file and renames it over the target.
    pub fn write<T: Serialize>(&self, snapshot: &T) -> Result<(), SnapshotError> {
        let mut payload = serde_json::to_vec_pretty(snapshot)?;
        payload.push(b'\n');

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&directory).map_err(|source| self.io_error(source))?;

        let mut staged = NamedTempFile::new_in(&directory).map_err(|source| self.io_error(source))?;
        staged
            .write_all(&payload)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|source| self.io_error(source))?;
        staged
            .persist(&self.path)
            .map_err(|error| self.io_error(error.error))?;

        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    #[test]
    fn serializes_domain_key_and_optional_fields() {
        let values = BTreeMap::from([("USD", "3.50-3.75%")]);
        let snapshot = Snapshot::new("rates", values, FALLBACK_SOURCE).with_scrape_error("blocked");

        let json = serde_json::to_value(&snapshot).expect("serializes");
        assert_eq!(json["rates"], json!({"USD": "3.50-3.75%"}));
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["scrapeError"], "blocked");
        assert!(json["fetchedAt"].as_str().is_some_and(|ts| ts.ends_with('Z')));
        assert!(json.get("errors").is_none());
        assert!(json.get("asOf").is_none());
        assert!(json.get("fallbackUsed").is_none());
    }

    #[test]
    fn empty_fallback_list_is_still_written() {
        let snapshot = Snapshot::new("atr", BTreeMap::from([("EUR/USD", 68)]), "yahoo-finance")
            .with_fallback_used(Vec::new());
        let json = serde_json::to_value(&snapshot).expect("serializes");
        assert_eq!(json["fallbackUsed"], json!([]));
    }

    #[test]
    fn write_creates_parent_directories_and_replaces_content() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("public").join("cb-rates.json");
        let writer = SnapshotWriter::new(&path);
        assert!(!writer.exists());

        writer.write(&json!({"rates": {"USD": "1.00%"}})).expect("first write");
        writer.write(&json!({"rates": {"USD": "2.00%"}})).expect("second write");

        assert!(writer.exists());
        let written: Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("readable")).expect("json");
        assert_eq!(written, json!({"rates": {"USD": "2.00%"}}));

        let leftovers = fs::read_dir(path.parent().expect("parent"))
            .expect("listable")
            .count();
        assert_eq!(leftovers, 1, "no temp files left behind");
    }
}
