//! Atomic file operations
//!
//! The event log is rewritten in full on every append, so a reader polling
//! the file must never see a half-written array. Writes go through a
//! temp-file-then-rename sequence:
//!
//! 1. Write to a sibling `.tmp` file
//! 2. Call sync_all() to flush to disk
//! 3. Rename the temp file over the final path (atomic on POSIX filesystems)
//!
//! A concurrent reader therefore observes either the previous log or the new
//! one, never a truncated mix.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically replace `path` with `content`
///
/// # Example
///
/// ```ignore
/// atomic_write("memory/message_history.json", "[]")?;
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> AtomicResult<()> {
    atomic_write_with(path, |file| file.write_all(content.as_bytes()))
}

/// Atomically replace `path` with whatever `write_fn` writes
///
/// Used by the event log to stream serialized JSON straight into the temp
/// file instead of building the whole document as a `String` first.
pub fn atomic_write_with<P, F>(path: P, write_fn: F) -> AtomicResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&temp_path)?;
    write_fn(&mut file)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Remove leftover `.tmp` files from interrupted writes
///
/// Called once at startup on the data directory. Returns how many files were
/// removed.
pub fn cleanup_temp_files<P: AsRef<Path>>(dir: P) -> AtomicResult<usize> {
    let dir = dir.as_ref();
    let mut cleaned = 0;

    if !dir.exists() {
        return Ok(0);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().map(|e| e == "tmp").unwrap_or(false) {
            fs::remove_file(&path)?;
            cleaned += 1;
        }
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.json");

        atomic_write(&path, "[]").unwrap();
        atomic_write(&path, "[1]").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[1]");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_atomic_write_with_streams_into_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.json");

        atomic_write_with(&path, |file| {
            write!(file, "[")?;
            write!(file, "]")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memory").join("nested").join("log.json");

        atomic_write(&path, "[]").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_failed_writer_leaves_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.json");
        atomic_write(&path, "[\"old\"]").unwrap();

        let result = atomic_write_with(&path, |_| {
            Err(io::Error::new(io::ErrorKind::Other, "serializer failed"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[\"old\"]");
    }

    #[test]
    fn test_cleanup_temp_files() {
        let temp_dir = TempDir::new().unwrap();

        fs::write(temp_dir.path().join("message_history.tmp"), "[").unwrap();
        fs::write(temp_dir.path().join("other.tmp"), "x").unwrap();
        fs::write(temp_dir.path().join("message_history.json"), "[]").unwrap();

        let cleaned = cleanup_temp_files(temp_dir.path()).unwrap();
        assert_eq!(cleaned, 2);
        assert!(temp_dir.path().join("message_history.json").exists());
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let cleaned = cleanup_temp_files(temp_dir.path().join("absent")).unwrap();
        assert_eq!(cleaned, 0);
    }
}
