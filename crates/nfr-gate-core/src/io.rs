//! Report source and sink.
//!
//! Reading is forgiving: a report that does not exist or does not parse is an
//! empty document. Anything else the filesystem refuses is fatal.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by the report source and sink.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read report {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write report {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// An empty mapping: what a missing report reads as.
pub fn empty_document() -> Value {
    Value::Object(Map::new())
}

/// Load a raw report.
///
/// A missing file or malformed JSON (including bytes that are not UTF-8)
/// yields an empty mapping. Other read
/// failures (permissions, a directory in place of a file) are errors.
pub fn load_report(path: impl AsRef<Path>) -> Result<Value, ReportError> {
    let path = path.as_ref();

    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "report not found, treating as empty");
            return Ok(empty_document());
        }
        Err(source) => {
            return Err(ReportError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    // Invalid UTF-8 surfaces here as a parse error, not a read error.
    match serde_json::from_slice(&contents) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "malformed report, treating as empty"
            );
            Ok(empty_document())
        }
    }
}

/// Load a report when a path was given, otherwise an empty mapping.
pub fn load_optional(path: Option<&Path>) -> Result<Value, ReportError> {
    match path {
        Some(path) => load_report(path),
        None => Ok(empty_document()),
    }
}

/// Write a document as pretty-printed JSON with a trailing newline,
/// creating parent directories as needed.
pub fn write_report<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    document: &T,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    let write_err = |source: io::Error| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    fs::write(path, rendered).map_err(write_err)?;

    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}
