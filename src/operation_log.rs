use anyhow::Result;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Log file name
const OPERATION_LOG_FILE: &str = "operation_log.txt";

/// Get the directory where app data is stored (same as the draft)
fn app_data_dir() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join("tsend");
        if !app_dir.exists() {
            let _ = fs::create_dir_all(&app_dir);
        }
        app_dir
    } else {
        // Fall back to current directory
        PathBuf::from(".")
    }
}

/// Get the full path to the operation log file
fn log_path() -> PathBuf {
    app_data_dir().join(OPERATION_LOG_FILE)
}

/// Get the full path to the operation log file as a string for display
pub fn log_file_path() -> String {
    log_path().display().to_string()
}

/// Append a structured log entry describing a user-requested operation.
pub fn append_log(operation: &str, chain_id: u64, details: impl AsRef<str>) -> Result<()> {
    let path = log_path();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let timestamp = Utc::now().to_rfc3339();
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

    writeln!(
        file,
        "[{}] chain_id={} operation={}",
        timestamp, chain_id, operation
    )?;

    let body = details.as_ref();
    if body.trim().is_empty() {
        writeln!(file, "  (no additional details)")?;
    } else {
        for line in body.lines() {
            if line.trim().is_empty() {
                writeln!(file)?;
            } else {
                writeln!(file, "  {}", line)?;
            }
        }
    }

    writeln!(file)?;
    Ok(())
}
