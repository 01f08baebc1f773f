//! Persistence for accepted contact-us requests.
//!
//! Stores are shared across every coroutine serving requests, so
//! implementations synchronize internally and take `&self`.

use crate::ids::SubmissionId;
use crate::model::NewContactUsRequest;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tracing::debug;

/// A contact-us request as it was written to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContactUsRequest {
    pub id: SubmissionId,
    /// Seconds since the unix epoch.
    pub submitted_at: u64,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl StoredContactUsRequest {
    fn from_new(new: &NewContactUsRequest) -> Self {
        let id = SubmissionId::new();
        Self {
            id,
            submitted_at: id.timestamp_ms() / 1000,
            name: new.name.clone(),
            email: new.email.clone(),
            message: new.message.clone(),
        }
    }
}

pub trait ContactUsStore: Send + Sync {
    fn save(&self, request: &NewContactUsRequest) -> io::Result<StoredContactUsRequest>;

    /// Every stored request, oldest first.
    fn all(&self) -> io::Result<Vec<StoredContactUsRequest>>;
}

/// Keeps requests in process memory. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    requests: RwLock<Vec<StoredContactUsRequest>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContactUsStore for InMemoryStore {
    fn save(&self, request: &NewContactUsRequest) -> io::Result<StoredContactUsRequest> {
        let stored = StoredContactUsRequest::from_new(request);
        self.requests
            .write()
            .map_err(|_| io::Error::other("in-memory store lock poisoned"))?
            .push(stored.clone());
        Ok(stored)
    }

    fn all(&self) -> io::Result<Vec<StoredContactUsRequest>> {
        self.requests
            .read()
            .map(|requests| requests.clone())
            .map_err(|_| io::Error::other("in-memory store lock poisoned"))
    }
}

/// Appends one JSON document per line to a file.
///
/// Writes are serialized through a mutex so concurrent submissions never
/// interleave within a line.
pub struct JsonLinesStore {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesStore {
    /// Open (creating if needed) the file at `path` and its parent directories.
    pub fn open<P: Into<PathBuf>>(path: P) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "Opened JSON lines store");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactUsStore for JsonLinesStore {
    fn save(&self, request: &NewContactUsRequest) -> io::Result<StoredContactUsRequest> {
        let stored = StoredContactUsRequest::from_new(request);
        let mut line = serde_json::to_vec(&stored).map_err(io::Error::other)?;
        line.push(b'\n');
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("store file lock poisoned"))?;
        file.write_all(&line)?;
        file.flush()?;
        Ok(stored)
    }

    fn all(&self) -> io::Result<Vec<StoredContactUsRequest>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut requests = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            requests.push(serde_json::from_str(&line).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, e)
            })?);
        }
        Ok(requests)
    }
}
