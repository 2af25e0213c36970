//! Audit sinks for the chat log.
//!
//! A sink receives the whole ordered chat log after every exchange and
//! replaces whatever it held before.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use parley_core::ChatRecord;
use tracing::debug;

use crate::error::AuditError;

/// Destination for the full chat log.
pub trait AuditSink: Send {
    /// Persist `records`, overwriting previous content.
    fn persist(&mut self, records: &[ChatRecord]) -> Result<(), AuditError>;
}

/// Writes the chat log as pretty-printed JSON to a file, creating missing
/// parent directories.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonFileSink {
    fn persist(&mut self, records: &[ChatRecord]) -> Result<(), AuditError> {
        let json = serde_json::to_string_pretty(records)?;
        let io_error = |source| AuditError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&self.path, json).map_err(io_error)?;
        debug!(path = %self.path.display(), records = records.len(), "Persisted chat log");
        Ok(())
    }
}

/// Keeps the latest persisted chat log in memory.
///
/// Clones share the same buffer, so a caller can hand one clone to the
/// orchestrator and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<MemorySinkState>>,
}

#[derive(Debug, Default)]
struct MemorySinkState {
    records: Vec<ChatRecord>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently persisted chat log
    pub fn records(&self) -> Vec<ChatRecord> {
        self.inner
            .lock()
            .map(|state| state.records.clone())
            .unwrap_or_default()
    }

    /// Number of times the log was persisted
    pub fn writes(&self) -> usize {
        self.inner.lock().map(|state| state.writes).unwrap_or(0)
    }
}

impl AuditSink for MemorySink {
    fn persist(&mut self, records: &[ChatRecord]) -> Result<(), AuditError> {
        if let Ok(mut state) = self.inner.lock() {
            state.records = records.to_vec();
            state.writes += 1;
        }
        Ok(())
    }
}
