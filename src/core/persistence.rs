use crate::core::app_log;
use crate::models::{StatePatch, WindowState};
use serde_json::{json, Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// JSON-backed store for the main window's [`WindowState`].
///
/// Reads fail open (defaults) and writes are best-effort: neither ever reaches the caller
/// except through [`StateStore::try_save`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> WindowState {
        match self.read_record() {
            Ok(record) => WindowState::from_record(&record),
            Err(e) => {
                self.report_read_error(&e);
                WindowState::default()
            }
        }
    }

    /// The raw persisted object, including keys this version doesn't know about.
    pub fn load_record(&self) -> Map<String, Value> {
        self.read_record().unwrap_or_else(|e| {
            self.report_read_error(&e);
            WindowState::default_record()
        })
    }

    pub fn save(&self, patch: &StatePatch) {
        if let Err(e) = self.try_save(patch) {
            app_log::warn(
                "state",
                "write_failed",
                json!({ "path": self.path.display().to_string(), "error": e.to_string() }),
            );
        }
    }

    pub fn try_save(&self, patch: &StatePatch) -> io::Result<()> {
        let mut record = self
            .read_record()
            .unwrap_or_else(|_| WindowState::default_record());
        for (key, value) in patch.to_record() {
            record.insert(key, value);
        }
        write_record_atomically(&self.path, &record)
    }

    fn read_record(&self) -> io::Result<Map<String, Value>> {
        let bytes = fs::read(&self.path)?;
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(record)) => Ok(record),
            Ok(_) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "state file is not a JSON object",
            )),
            Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        }
    }

    fn report_read_error(&self, e: &io::Error) {
        if e.kind() == io::ErrorKind::NotFound {
            return;
        }
        app_log::warn(
            "state",
            "read_failed",
            json!({ "path": self.path.display().to_string(), "error": e.to_string() }),
        );
    }
}

fn write_record_atomically(path: &Path, record: &Map<String, Value>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("tmp");
    let result = write_temp(&tmp, record).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_temp(tmp: &Path, record: &Map<String, Value>) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    serde_json::to_writer(&mut file, record)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    file.write_all(b"\n")?;
    file.sync_all()
}
