//! File-backed catalog store.
//!
//! The whole file is read on `load` and rewritten on every durable mutation.
//! Lookups are by exact `track_id`; misses are reported as `None`/`false`.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::CatalogError;

use super::display::list_line;
use super::ids::next_track_id;
use super::model::{HEADER, NewTrack, TrackRecord};
use super::search::fuzzy_match_positions;

/// Legacy "not found" value for numeric fields.
pub const NOT_FOUND: i64 = -1;

/// In-memory catalog bound to one backing file.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    records: Vec<TrackRecord>,
    index: HashMap<String, usize>,
    /// Set while the backing file exists but could not be read. Persisting
    /// is refused until a later load succeeds.
    load_error: Option<String>,
}

impl CatalogStore {
    /// Create an empty store for `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            index: HashMap::new(),
            load_error: None,
        }
    }

    /// Create a store for `path` and load it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Why the last load came back empty, when the file exists but is unreadable.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Replace the in-memory catalog with the contents of the backing file.
    ///
    /// Never fails: a missing file yields an empty catalog, and an unreadable
    /// or malformed file is logged and also yields an empty catalog. Rows are
    /// all parsed before any is kept, so a bad row never leaves a partial load.
    /// In that last case the file is left alone: see [`persist`](Self::persist).
    pub fn load(&mut self) -> &[TrackRecord] {
        self.clear();
        self.load_error = None;

        match read_records(&self.path) {
            Ok(Some(rows)) => {
                for row in rows {
                    self.upsert(row);
                }
                info!(path = %self.path.display(), tracks = self.records.len(), "loaded catalog");
            }
            Ok(None) => {
                info!(path = %self.path.display(), "catalog file not found, starting empty");
            }
            Err(e) => {
                warn!(error = %e, "failed to load catalog, starting empty");
                self.load_error = Some(e.to_string());
            }
        }

        &self.records
    }

    /// Write every record back to the backing file, replacing its contents.
    ///
    /// Fails with [`CatalogError::Unreadable`] while the last load could not
    /// read an existing file, so its rows are never overwritten.
    pub fn persist(&self) -> Result<(), CatalogError> {
        if let Some(reason) = &self.load_error {
            return Err(CatalogError::Unreadable {
                path: self.path.clone(),
                reason: reason.clone(),
            });
        }

        let io_err = |source| CatalogError::Io {
            path: self.path.clone(),
            source,
        };
        let csv_err = |source| CatalogError::Csv {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_path(&self.path)
            .map_err(csv_err)?;

        writer.write_record(HEADER).map_err(csv_err)?;
        for record in &self.records {
            writer.serialize(record).map_err(csv_err)?;
        }
        writer.flush().map_err(io_err)?;

        debug!(path = %self.path.display(), tracks = self.records.len(), "persisted catalog");
        Ok(())
    }

    pub fn get(&self, track_id: &str) -> Option<&TrackRecord> {
        self.index.get(track_id).map(|&i| &self.records[i])
    }

    fn get_mut(&mut self, track_id: &str) -> Option<&mut TrackRecord> {
        let i = self.index.get(track_id).copied()?;
        self.records.get_mut(i)
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.index.contains_key(track_id)
    }

    pub fn name(&self, track_id: &str) -> Option<&str> {
        self.get(track_id).map(|r| r.name.as_str())
    }

    pub fn artist(&self, track_id: &str) -> Option<&str> {
        self.get(track_id).map(|r| r.artist.as_str())
    }

    pub fn source(&self, track_id: &str) -> Option<&str> {
        self.get(track_id).map(|r| r.source.as_str())
    }

    pub fn rating(&self, track_id: &str) -> Option<u32> {
        self.get(track_id).map(|r| r.rating)
    }

    pub fn play_count(&self, track_id: &str) -> Option<u32> {
        self.get(track_id).map(|r| r.play_count)
    }

    /// Rating, or [`NOT_FOUND`] when the record is absent.
    pub fn rating_or_sentinel(&self, track_id: &str) -> i64 {
        self.rating(track_id).map_or(NOT_FOUND, i64::from)
    }

    /// Play count, or [`NOT_FOUND`] when the record is absent.
    pub fn play_count_or_sentinel(&self, track_id: &str) -> i64 {
        self.play_count(track_id).map_or(NOT_FOUND, i64::from)
    }

    /// Bump the play count in memory only. Returns whether the record exists.
    pub fn increment_play_count(&mut self, track_id: &str) -> bool {
        match self.get_mut(track_id) {
            Some(record) => {
                record.play_count = record.play_count.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Bump the play count and persist.
    pub fn record_play(&mut self, track_id: &str) -> Result<bool, CatalogError> {
        if !self.increment_play_count(track_id) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn set_rating(&mut self, track_id: &str, rating: u32) -> Result<bool, CatalogError> {
        let updated = self.update(track_id, |r| r.rating = rating)?;
        if updated {
            info!(track_id, rating, "updated rating");
        }
        Ok(updated)
    }

    pub fn set_name(&mut self, track_id: &str, name: &str) -> Result<bool, CatalogError> {
        self.update(track_id, |r| r.name = name.to_string())
    }

    pub fn set_artist(&mut self, track_id: &str, artist: &str) -> Result<bool, CatalogError> {
        self.update(track_id, |r| r.artist = artist.to_string())
    }

    /// Add or replace `record` and persist.
    pub fn insert(&mut self, record: TrackRecord) -> Result<(), CatalogError> {
        self.upsert(record);
        self.persist()
    }

    /// Append `track` under a freshly allocated id and persist.
    ///
    /// The legacy `ID` column gets the number of records that preceded it.
    pub fn add_track(&mut self, track: NewTrack) -> Result<TrackRecord, CatalogError> {
        let record = TrackRecord {
            track_id: self.next_track_id(),
            legacy_id: self.records.len().to_string(),
            name: track.name,
            artist: track.artist,
            source: track.source,
            rating: track.rating,
            play_count: 0,
        };
        self.insert(record.clone())?;
        info!(track_id = %record.track_id, name = %record.name, "added track");
        Ok(record)
    }

    pub fn next_track_id(&self) -> String {
        next_track_id(self.records.iter().map(|r| r.track_id.as_str()))
    }

    /// Every record, in the order the keys were first seen.
    pub fn list_all(&self) -> &[TrackRecord] {
        &self.records
    }

    /// The library screen text block, one entry per record.
    pub fn list_all_text(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{}\n \n", list_line(r, false)))
            .collect()
    }

    /// Records whose `"Artist - Name"` fuzzily matches `query`, in catalog order.
    pub fn search(&self, query: &str) -> Vec<&TrackRecord> {
        self.search_positions(query)
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }

    /// Like [`search`](Self::search), but yields positions in [`list_all`](Self::list_all).
    pub fn search_positions(&self, query: &str) -> Vec<usize> {
        let query = query.trim();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| fuzzy_match_positions(&r.display(), query).is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether any record already points at `source`.
    pub fn has_source(&self, source: &str) -> bool {
        self.records.iter().any(|r| r.source == source)
    }

    fn update(
        &mut self,
        track_id: &str,
        apply: impl FnOnce(&mut TrackRecord),
    ) -> Result<bool, CatalogError> {
        let Some(record) = self.get_mut(track_id) else {
            return Ok(false);
        };
        apply(record);
        self.persist()?;
        Ok(true)
    }

    /// Insert keeping first-seen position; a repeated key overwrites in place.
    fn upsert(&mut self, record: TrackRecord) {
        let existing = self.index.get(&record.track_id).copied();
        match existing {
            Some(i) => self.records[i] = record,
            None => {
                self.index.insert(record.track_id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }
}

/// Read all rows of `path`. `Ok(None)` when the file does not exist.
fn read_records(path: &Path) -> Result<Option<Vec<TrackRecord>>, CatalogError> {
    let opened = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path);
    let mut reader = match opened {
        Ok(r) => r,
        Err(e) => {
            if let csv::ErrorKind::Io(io) = e.kind() {
                if io.kind() == ErrorKind::NotFound {
                    return Ok(None);
                }
            }
            return Err(CatalogError::Csv {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let rows = reader
        .deserialize::<TrackRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| CatalogError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(rows))
}
