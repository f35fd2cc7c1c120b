//! # File I/O Module
//!
//! Job and report files are pretty-printed JSON.
//!
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **Version validation**: files from an incompatible schema are rejected
//!
//! ## Example
//!
//! ```rust,no_run
//! use rcbeam_core::file_io::{load_job, save_job};
//! use rcbeam_core::job::OptimizationJob;
//! use std::path::Path;
//!
//! let job = OptimizationJob::new("Engineer", "26-001");
//! save_job(&job, Path::new("beam_b1.json"))?;
//!
//! let loaded = load_job(Path::new("beam_b1.json"))?;
//! assert_eq!(loaded.meta.job_id, "26-001");
//! # Ok::<(), rcbeam_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::job::{OptimizationJob, OptimizationReport, SCHEMA_VERSION};

/// Save a job with atomic write semantics.
pub fn save_job(job: &OptimizationJob, path: &Path) -> CalcResult<()> {
    write_json_atomic(job, path)
}

/// Load a job, rejecting incompatible schema versions.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON or unknown grade
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_job(path: &Path) -> CalcResult<OptimizationJob> {
    let job: OptimizationJob = read_json(path)?;
    validate_version(&job.meta.version)?;
    Ok(job)
}

/// Save an optimization report with atomic write semantics.
pub fn save_report(report: &OptimizationReport, path: &Path) -> CalcResult<()> {
    write_json_atomic(report, path)
}

/// Load an optimization report, rejecting incompatible schema versions.
pub fn load_report(path: &Path) -> CalcResult<OptimizationReport> {
    let report: OptimizationReport = read_json(path)?;
    validate_version(&report.meta.version)?;
    Ok(report)
}

/// Write any serializable value as pretty JSON.
///
/// 1. Serialize to JSON
/// 2. Write to a sibling temporary file
/// 3. Sync to disk (fsync)
/// 4. Rename over the target (atomic on most filesystems)
pub fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::serialization(e.to_string()))?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = json.len(), "saved file");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// `beam.json` -> `beam.json.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    path.with_extension(extension)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}
