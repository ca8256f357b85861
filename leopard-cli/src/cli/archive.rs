//! Archive persistence: a local JSON file of recent generations and an
//! optional shared gallery directory.
//!
//! Persistence is best-effort from the caller's point of view. Reads never
//! fail on a missing or corrupt local file; a failed shared write is only a
//! warning once the local write has succeeded.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use leopard::GeneratedLeopard;

use super::config::ArchiveConfig;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record does not contain an SVG scene")]
    InvalidRecord,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io { path: path.to_path_buf(), source }
}

/// `data:` URL embedding an SVG document, used as the shared thumbnail.
pub fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}

/// Which archive to browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveView {
    #[default]
    Local,
    Shared,
}

impl fmt::Display for ArchiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveView::Local => f.write_str("local"),
            ArchiveView::Shared => f.write_str("shared"),
        }
    }
}

impl FromStr for ArchiveView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(ArchiveView::Local),
            "shared" => Ok(ArchiveView::Shared),
            other => Err(format!("unknown archive view '{}': use 'local' or 'shared'", other)),
        }
    }
}

/// JSON array file holding the newest `limit` records, oldest first.
#[derive(Debug, Clone)]
pub struct LocalArchive {
    path: PathBuf,
    limit: usize,
}

impl LocalArchive {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self { path: path.into(), limit: limit.max(1) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored record in file order. Missing or unreadable files read
    /// as empty.
    pub fn load(&self) -> Vec<GeneratedLeopard> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read local archive");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<GeneratedLeopard>>(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "local archive is not a record list, ignoring it");
                Vec::new()
            }
        }
    }

    /// Append a record, dropping the oldest beyond the limit.
    pub fn save(&self, record: &GeneratedLeopard) -> Result<(), ArchiveError> {
        if !record.is_showable() {
            return Err(ArchiveError::InvalidRecord);
        }

        let mut records = self.load();
        records.push(record.clone());
        if records.len() > self.limit {
            let excess = records.len() - self.limit;
            records.drain(..excess);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        let json = serde_json::to_string(&records)?;
        fs::write(&self.path, json).map_err(io_error(&self.path))?;

        debug!(path = %self.path.display(), count = records.len(), "local archive written");
        Ok(())
    }
}

/// One document in the shared gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SharedEntry {
    #[serde(flatten)]
    record: GeneratedLeopard,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

/// Directory of one JSON document per record, named `<timestamp>-<n>.json`.
#[derive(Debug, Clone)]
pub struct SharedArchive {
    dir: PathBuf,
    limit: usize,
}

impl SharedArchive {
    pub fn new(dir: impl Into<PathBuf>, limit: usize) -> Self {
        Self { dir: dir.into(), limit }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a record with its thumbnail and creation time. Returns the
    /// document path.
    pub fn save(&self, record: &GeneratedLeopard, created_at: DateTime<Utc>) -> Result<PathBuf, ArchiveError> {
        if !record.is_showable() {
            return Err(ArchiveError::InvalidRecord);
        }
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let mut record = record.clone();
        record.thumbnail_url = Some(svg_data_url(&record.svg));
        let entry = SharedEntry { record, created_at };
        let json = serde_json::to_string_pretty(&entry)?;

        let path = self.free_path(entry.record.timestamp);
        fs::write(&path, json).map_err(io_error(&path))?;
        Ok(path)
    }

    fn free_path(&self, timestamp: i64) -> PathBuf {
        let mut n = 0u32;
        loop {
            let candidate = self.dir.join(format!("{}-{}.json", timestamp, n));
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Newest `limit` records by creation time. Unreadable documents are
    /// skipped; a missing directory reads as empty.
    pub fn load(&self) -> Result<Vec<GeneratedLeopard>, ArchiveError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ArchiveError::Io { path: self.dir.clone(), source: e }),
        };

        let mut docs: Vec<SharedEntry> = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_error(&self.dir))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|c| serde_json::from_str::<SharedEntry>(&c).map_err(|e| e.to_string()));
            match parsed {
                Ok(doc) => docs.push(doc),
                Err(e) => debug!(path = %path.display(), error = %e, "skipping shared document"),
            }
        }

        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        docs.truncate(self.limit);

        Ok(docs
            .into_iter()
            .map(|doc| {
                let mut record = doc.record;
                // Gallery entries are timed by their creation stamp
                record.timestamp = doc.created_at.timestamp_millis();
                record
            })
            .collect())
    }
}

/// What a save reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Shared document written, if a shared archive is configured and the
    /// write succeeded.
    pub shared_path: Option<PathBuf>,
    /// Shared write error, reported but not fatal.
    pub shared_error: Option<String>,
}

/// Local archive plus optional shared gallery.
#[derive(Debug, Clone)]
pub struct Archive {
    local: LocalArchive,
    shared: Option<SharedArchive>,
}

impl Archive {
    pub fn new(local: LocalArchive, shared: Option<SharedArchive>) -> Self {
        Self { local, shared }
    }

    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self::new(
            LocalArchive::new(&config.local_path, config.local_limit),
            config
                .shared_dir
                .as_ref()
                .map(|dir| SharedArchive::new(dir, config.shared_limit)),
        )
    }

    pub fn local(&self) -> &LocalArchive {
        &self.local
    }

    pub fn has_shared(&self) -> bool {
        self.shared.is_some()
    }

    /// Save locally, then to the shared gallery if configured.
    pub fn save(&self, record: &GeneratedLeopard) -> Result<SaveOutcome, ArchiveError> {
        self.local.save(record)?;
        info!(path = %self.local.path().display(), "saved to local archive");

        let mut outcome = SaveOutcome { shared_path: None, shared_error: None };
        if let Some(shared) = &self.shared {
            match shared.save(record, Utc::now()) {
                Ok(path) => {
                    info!(path = %path.display(), "saved to shared archive");
                    outcome.shared_path = Some(path);
                }
                Err(e) => {
                    warn!(dir = %shared.dir().display(), error = %e, "shared archive save failed");
                    outcome.shared_error = Some(e.to_string());
                }
            }
        }
        Ok(outcome)
    }

    /// Listable records of a view, in storage order (local: oldest first;
    /// shared: newest first). Entries with only a thumbnail are included;
    /// callers restoring a scene check [`GeneratedLeopard::is_showable`].
    pub fn load(&self, view: ArchiveView) -> Result<Vec<GeneratedLeopard>, ArchiveError> {
        let records = match view {
            ArchiveView::Local => self.local.load(),
            ArchiveView::Shared => match &self.shared {
                Some(shared) => shared.load()?,
                None => Vec::new(),
            },
        };

        let total = records.len();
        let listable: Vec<_> = records.into_iter().filter(|r| r.is_listable()).collect();
        if listable.len() < total {
            debug!(view = %view, skipped = total - listable.len(), "skipped records without scene or thumbnail");
        }
        Ok(listable)
    }
}
