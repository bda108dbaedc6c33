// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! On-disk storage for employee documents.
//!
//! Files live at `{root}/{employee_id}/{prefix}_{name}` where `prefix` is
//! random hex and `name` is the sanitized original filename, so two
//! uploads of `resume.pdf` never overwrite each other.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::error::ApiError;

/// Largest accepted upload (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Accepted file extensions, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "pdf", "doc", "docx", "xlsx", "xls"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File is empty")]
    EmptyFile,

    #[error("File too large: {size} bytes (max {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("Filename '{0}' has no usable characters")]
    InvalidFilename(String),

    #[error("Unsupported file type '{0}'; allowed: jpeg, jpg, png, pdf, doc, docx, xlsx, xls")]
    DisallowedExtension(String),

    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => {
                tracing::error!(error = %e, "Document write failed");
                Self::Internal {
                    message: String::from("Failed to store the uploaded file"),
                }
            }
            other => Self::InvalidInput {
                field: String::from("file"),
                message: other.to_string(),
            },
        }
    }
}

/// A file written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub size_bytes: usize,
}

/// Reduces a client-supplied filename to a safe final path component.
///
/// Directory parts are dropped and anything other than ASCII letters,
/// digits, `.`, `-` and `_` becomes `_`. Leading dots are removed so the
/// result is never hidden or a parent reference. Returns `None` if nothing
/// usable remains.
#[must_use]
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base: &str = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned: &str = cleaned.trim_start_matches('.');
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Lowercased extension of `name`, if it has one.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Documents stored under a root directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates an upload without writing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is empty, larger than
    /// [`MAX_UPLOAD_BYTES`], unnamed, or of a type outside
    /// [`ALLOWED_EXTENSIONS`].
    pub fn check(original_filename: &str, content: &[u8]) -> Result<String, StorageError> {
        if content.is_empty() {
            return Err(StorageError::EmptyFile);
        }
        if content.len() > MAX_UPLOAD_BYTES {
            return Err(StorageError::TooLarge {
                size: content.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }
        let safe_name: String = sanitize_filename(original_filename)
            .ok_or_else(|| StorageError::InvalidFilename(original_filename.to_string()))?;
        let ext: String = extension_of(&safe_name).unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(StorageError::DisallowedExtension(ext));
        }
        Ok(safe_name)
    }

    /// Writes an upload for an employee.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`DocumentStore::check`] or an I/O
    /// error if the file cannot be written.
    pub fn store(
        &self,
        employee_id: i64,
        original_filename: &str,
        content: &[u8],
    ) -> Result<StoredFile, StorageError> {
        let safe_name: String = Self::check(original_filename, content)?;

        let dir: PathBuf = self.root.join(employee_id.to_string());
        std::fs::create_dir_all(&dir)?;
        let path: PathBuf = dir.join(format!("{:016x}_{safe_name}", rand::random::<u64>()));
        std::fs::write(&path, content)?;

        info!(employee_id, path = %path.display(), size = content.len(), "Document stored");
        Ok(StoredFile {
            path,
            size_bytes: content.len(),
        })
    }

    /// Removes a stored file. Used to roll back when the database insert fails.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be removed.
    pub fn remove(path: &Path) -> Result<(), StorageError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
