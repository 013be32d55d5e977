//! Destinations for formatted ADIF records.
//!
//! Each station callsign gets its own log. A log starts with the ADIF header
//! and then only ever grows by whole records.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adif::{header, AdifRecord};
use crate::error::{Error, Result};

/// Suffix appended to the station callsign to name its log file.
pub const FILE_SUFFIX: &str = "_adif_export.adi";

/// Somewhere to append ADIF records, one log per station callsign.
pub trait AdifSink {
    /// Append a record to the station's log, creating the log if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be stored. Earlier records are
    /// never affected.
    fn append(&mut self, station_callsign: &str, record: &AdifRecord) -> Result<()>;
}

/// Writes `<STATION>_adif_export.adi` files into a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    directory: PathBuf,
}

impl FileSink {
    /// Create a sink writing into `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory holding the logs.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the log for a station callsign.
    #[must_use]
    pub fn path_for(&self, station_callsign: &str) -> PathBuf {
        self.directory
            .join(format!("{station_callsign}{FILE_SUFFIX}"))
    }

    fn ensure_directory(&self) -> Result<()> {
        if !self.directory.exists() {
            std::fs::create_dir_all(&self.directory).map_err(|source| Error::DirectoryCreate {
                path: self.directory.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl AdifSink for FileSink {
    fn append(&mut self, station_callsign: &str, record: &AdifRecord) -> Result<()> {
        self.ensure_directory()?;

        let path = self.path_for(station_callsign);
        let is_new = !path.exists();

        let mut block = if is_new { header() } else { String::new() };
        block.push_str(&record.to_string());

        let write = |path: &Path| -> std::io::Result<()> {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(block.as_bytes())?;
            file.flush()
        };
        write(&path).map_err(|source| Error::OutputWrite {
            path: path.clone(),
            source,
        })?;

        if is_new {
            info!("Created ADIF log {}", path.display());
        }
        debug!("Appended {} fields to {}", record.len(), path.display());
        Ok(())
    }
}

/// Keeps logs in memory, keyed by station callsign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    logs: HashMap<String, String>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full text of a station's log, header included.
    #[must_use]
    pub fn contents(&self, station_callsign: &str) -> Option<&str> {
        self.logs.get(station_callsign).map(String::as_str)
    }

    /// Number of station logs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    /// Check if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

impl AdifSink for MemorySink {
    fn append(&mut self, station_callsign: &str, record: &AdifRecord) -> Result<()> {
        self.logs
            .entry(station_callsign.to_string())
            .or_insert_with(header)
            .push_str(&record.to_string());
        Ok(())
    }
}
