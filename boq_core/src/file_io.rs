//! # File I/O Module
//!
//! Persists estimate documents and rate catalogs as JSON, with safety
//! features for shared drives:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent concurrent edits on shared drives
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Estimate documents are saved as `.boq` files containing JSON. Lock files
//! use `.boq.lock` extension with metadata about who holds the lock.
//! Catalogs are plain `.json` files deserializing to [`RateCatalog`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use boq_core::catalog::RateCatalog;
//! use boq_core::estimate::estimate;
//! use boq_core::file_io::{save_estimate, EstimateDocument, FileLock};
//! use boq_core::project::ProjectSpecification;
//! use std::path::Path;
//!
//! let spec = ProjectSpecification::new("Villa", 1000.0, "Karachi");
//! let result = estimate(&spec, RateCatalog::builtin()).unwrap();
//! let doc = EstimateDocument::new(spec, result);
//! let path = Path::new("villa.boq");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "surveyor@company.com").unwrap();
//!
//! // Save with atomic write
//! save_estimate(&doc, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::RateCatalog;
use crate::errors::{BoqResult, EstimateError};
use crate::estimate::EstimateResult;
use crate::project::ProjectSpecification;

/// Current schema version for .boq files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A persisted estimate: the specification that produced it, the result,
/// and document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateDocument {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Document id
    pub id: Uuid,

    /// When the estimate was produced
    pub created: DateTime<Utc>,

    /// The input specification
    pub spec: ProjectSpecification,

    /// The computed result
    pub result: EstimateResult,
}

impl EstimateDocument {
    /// Wrap a spec and its result into a new document
    pub fn new(spec: ProjectSpecification, result: EstimateResult) -> Self {
        EstimateDocument {
            version: SCHEMA_VERSION.to_string(),
            id: Uuid::new_v4(),
            created: Utc::now(),
            spec,
            result,
        }
    }
}

/// Lock file metadata stored in .boq.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    /// Path to the main document file
    document_path: PathBuf,
    /// Path to the lock file
    lock_path: PathBuf,
    /// The underlying file handle (keeps OS lock)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a document file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the .boq document file
    /// * `user_id` - Identifier for the user acquiring the lock
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(EstimateError::FileLocked)` - Another process holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> BoqResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        // Check if lock file exists and contains valid lock info
        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                // Check if the lock is stale (process no longer running)
                if !is_lock_stale(&existing) {
                    return Err(EstimateError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                // Lock is stale, we can take it over
            }
        }

        // Create/open the lock file
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                EstimateError::file_error(
                    "create lock",
                    lock_path.display().to_string(),
                    e.to_string(),
                )
            })?;

        // Try to acquire exclusive OS-level lock (non-blocking)
        lock_file.try_lock_exclusive().map_err(|_| {
            EstimateError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        // Write lock info to the file using the same handle
        let lock_json =
            serde_json::to_string_pretty(&info).map_err(|e| EstimateError::SerializationError {
                reason: e.to_string(),
            })?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            EstimateError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            EstimateError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            document_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Get the path to the document file
    pub fn document_path(&self) -> &Path {
        &self.document_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Remove the lock file
        let _ = fs::remove_file(&self.lock_path);
        // OS lock is released when _lock_file is dropped
    }
}

/// Get the lock file path for a document file
fn lock_path_for(document_path: &Path) -> PathBuf {
    let mut lock_path = document_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Read lock info from a lock file
fn read_lock_info(lock_path: &Path) -> BoqResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        EstimateError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        EstimateError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
        reason: e.to_string(),
    })
}

/// Check if a lock is stale (the process that created it is no longer running)
fn is_lock_stale(info: &LockInfo) -> bool {
    // Check if it's our machine
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            // Same machine - check if process is still running
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    // If PID not found, lock is stale
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    // If lock is more than 24 hours old, consider it stale
    let age = Utc::now() - info.locked_at;
    if age.num_hours() > 24 {
        return true;
    }

    false
}

/// Serialize a value to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename to the final path (atomic on most filesystems)
///
/// This prevents corruption if the process is interrupted during write.
fn save_json<T: Serialize>(value: &T, path: &Path) -> BoqResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        EstimateError::SerializationError {
            reason: e.to_string(),
        }
    })?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        EstimateError::file_error(
            "create temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        EstimateError::file_error(
            "write temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.sync_all().map_err(|e| {
        EstimateError::file_error(
            "sync temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        EstimateError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    path.with_extension(extension)
}

fn read_to_string(path: &Path) -> BoqResult<String> {
    let mut file = File::open(path).map_err(|e| {
        EstimateError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        EstimateError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    Ok(contents)
}

/// Save an estimate document to a `.boq` file with atomic write semantics.
pub fn save_estimate(doc: &EstimateDocument, path: &Path) -> BoqResult<()> {
    save_json(doc, path)
}

/// Load an estimate document from a `.boq` file.
///
/// # Returns
///
/// * `Ok(EstimateDocument)` - Successfully loaded document
/// * `Err(EstimateError::VersionMismatch)` - File version is incompatible
/// * `Err(EstimateError::SerializationError)` - Invalid JSON
/// * `Err(EstimateError::FileError)` - I/O error
pub fn load_estimate(path: &Path) -> BoqResult<EstimateDocument> {
    let contents = read_to_string(path)?;

    let doc: EstimateDocument =
        serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&doc.version)?;

    Ok(doc)
}

/// Load an estimate document, returning whether it's locked by another user.
///
/// # Returns
///
/// * `Ok((doc, None))` - Loaded successfully, no lock
/// * `Ok((doc, Some(LockInfo)))` - Loaded, but another user has the lock
/// * `Err(_)` - Failed to load
pub fn load_estimate_with_lock_check(
    path: &Path,
) -> BoqResult<(EstimateDocument, Option<LockInfo>)> {
    let doc = load_estimate(path)?;
    let lock_info = FileLock::check(path);
    Ok((doc, lock_info))
}

/// Save a rate catalog to a JSON file with atomic write semantics.
pub fn save_catalog(catalog: &RateCatalog, path: &Path) -> BoqResult<()> {
    save_json(catalog, path)
}

/// Load a rate catalog from a JSON file.
///
/// Lets deployments replace the built-in rates without recompiling the
/// engine.
pub fn load_catalog(path: &Path) -> BoqResult<RateCatalog> {
    let contents = read_to_string(path)?;

    serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> BoqResult<()> {
    // Parse semver-style versions
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(EstimateError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(EstimateError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // For 0.x versions, newer minor versions are not supported
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(EstimateError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::estimate;
    use std::env::temp_dir;

    fn temp_doc_path(name: &str) -> PathBuf {
        temp_dir().join(format!("takhmina_test_{}.boq", name))
    }

    fn sample_document() -> EstimateDocument {
        let spec = ProjectSpecification::new("Saved Villa", 1000.0, "Karachi")
            .with_rooms(4, 10.0, 20.0);
        let result = estimate(&spec, RateCatalog::builtin()).unwrap();
        EstimateDocument::new(spec, result)
    }

    #[test]
    fn test_lock_path_generation() {
        let doc_path = Path::new("/path/to/estimate.boq");
        let lock_path = lock_path_for(doc_path);
        assert_eq!(lock_path, Path::new("/path/to/estimate.boq.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("test@example.com");
        assert_eq!(info.user_id, "test@example.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_doc_path("roundtrip");

        let doc = sample_document();
        save_estimate(&doc, &path).unwrap();

        let loaded = load_estimate(&path).unwrap();
        assert_eq!(loaded.id, doc.id);
        assert_eq!(loaded.spec, doc.spec);
        assert_eq!(loaded.result, doc.result);
        assert_eq!(loaded.version, SCHEMA_VERSION);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_doc_path("atomic");
        let tmp_path = path.with_extension("boq.tmp");

        save_estimate(&sample_document(), &path).unwrap();

        // Temp file should not exist after successful save
        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_doc_path("lock_test");

        // Create an empty file first
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");

        // Lock file should exist
        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);

        // Lock file should be removed
        assert!(!lock_path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        // Same version should pass
        assert!(validate_version(SCHEMA_VERSION).is_ok());

        // Same major.minor should pass
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());

        // Different major should fail
        assert!(validate_version("1.0.0").is_err());

        // Newer minor (in 0.x) should fail
        assert!(validate_version("0.2.0").is_err());
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_doc_path("lock_check");

        save_estimate(&sample_document(), &path).unwrap();

        // Load without lock - should have no lock info
        let (loaded, lock_info) = load_estimate_with_lock_check(&path).unwrap();
        assert_eq!(loaded.spec.project_name, "Saved Villa");
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_catalog_save_and_load() {
        let path = temp_dir().join("takhmina_test_catalog.json");

        let catalog = RateCatalog::builtin();
        save_catalog(catalog, &path).unwrap();

        let loaded = load_catalog(&path).unwrap();
        assert_eq!(&loaded, catalog);
        assert_eq!(loaded.default_city, "Karachi");

        let _ = fs::remove_file(&path);
    }
}
