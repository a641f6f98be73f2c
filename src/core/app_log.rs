use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

const LOG_FILE_NAME: &str = "app.log.jsonl";
const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;
const MAX_ROTATIONS: usize = 3;

static LOG_DIR: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppLogRecord {
    pub ts_ms: i64,
    pub level: String,
    pub scope: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl AppLogRecord {
    fn new(level: &str, scope: &str, message: &str, data: Option<Value>) -> Self {
        Self {
            ts_ms: Utc::now().timestamp_millis(),
            level: level.to_string(),
            scope: scope.to_string(),
            message: message.to_string(),
            data,
        }
    }
}

/// Points the process-wide sink at `dir`. Records emitted before this are only echoed to stderr.
pub fn init(dir: PathBuf) -> Result<(), String> {
    fs::create_dir_all(&dir).map_err(|e| format!("Failed to create log dir: {}", e))?;
    *LOG_DIR.lock() = Some(dir);
    Ok(())
}

fn log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE_NAME)
}

fn rotated_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("app.log.{}.jsonl", index))
}

fn rotate_if_needed(dir: &Path, max_bytes: u64) -> Result<(), String> {
    let path = log_path(dir);
    let Ok(meta) = fs::metadata(&path) else {
        return Ok(());
    };
    if meta.len() < max_bytes {
        return Ok(());
    }

    let oldest = rotated_path(dir, MAX_ROTATIONS);
    if oldest.exists() {
        fs::remove_file(&oldest)
            .map_err(|e| format!("Failed to remove old log {}: {}", oldest.display(), e))?;
    }

    for i in (1..MAX_ROTATIONS).rev() {
        let src = rotated_path(dir, i);
        let dst = rotated_path(dir, i + 1);
        if src.exists() {
            fs::rename(&src, &dst).map_err(|e| {
                format!("Failed to rotate log ({} -> {}): {}", src.display(), dst.display(), e)
            })?;
        }
    }

    let first = rotated_path(dir, 1);
    fs::rename(&path, &first).map_err(|e| {
        format!("Failed to rotate log ({} -> {}): {}", path.display(), first.display(), e)
    })?;
    Ok(())
}

fn append_in(dir: &Path, record: &AppLogRecord, max_bytes: u64) -> Result<(), String> {
    rotate_if_needed(dir, max_bytes)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(dir))
        .map_err(|e| format!("Failed to open log file: {}", e))?;

    let line = serde_json::to_string(record)
        .map_err(|e| format!("Failed to serialize log record: {}", e))?;
    file.write_all(line.as_bytes())
        .and_then(|_| file.write_all(b"\n"))
        .map_err(|e| format!("Failed to write log record: {}", e))?;
    Ok(())
}

pub fn append(record: AppLogRecord) {
    if cfg!(debug_assertions) {
        eprintln!(
            "[{}] {}: {}{}",
            record.level,
            record.scope,
            record.message,
            record
                .data
                .as_ref()
                .map(|d| format!(" {}", d))
                .unwrap_or_default()
        );
    }

    let guard = LOG_DIR.lock();
    let Some(dir) = guard.as_ref() else {
        return;
    };
    if let Err(e) = append_in(dir, &record, MAX_LOG_BYTES) {
        eprintln!("Failed to append log record: {}", e);
    }
}

pub fn info(scope: &str, message: &str) {
    append(AppLogRecord::new("info", scope, message, None));
}

pub fn info_with(scope: &str, message: &str, data: Value) {
    append(AppLogRecord::new("info", scope, message, Some(data)));
}

pub fn warn(scope: &str, message: &str, data: Value) {
    append(AppLogRecord::new("warn", scope, message, Some(data)));
}

pub fn error(scope: &str, message: &str, data: Value) {
    append(AppLogRecord::new("error", scope, message, Some(data)));
}

pub fn install_panic_hook() {
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "panic".to_string()
        };
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());

        // try_lock: the panic may have happened while the sink was held.
        if let Some(guard) = LOG_DIR.try_lock() {
            if let Some(dir) = guard.as_ref() {
                let record = AppLogRecord::new(
                    "error",
                    "panic",
                    &format!("{} ({})", payload, location),
                    None,
                );
                let _ = append_in(dir, &record, MAX_LOG_BYTES);
            }
        }

        prev(info);
    }));
}
