use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::canvas::{CanvasError, PixelBuffer};

const DEFAULT_FILE_PREFIX: &str = "drawing_";
const PNG_EXTENSION: &str = ".png";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),
    #[error("failed to encode canvas: {0}")]
    Encode(#[from] CanvasError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub path: PathBuf,
    pub filename: String,
}

/// Writes canvases as PNG files into one directory.
#[derive(Debug, Clone)]
pub struct ExportService {
    export_dir: PathBuf,
}

impl ExportService {
    pub fn with_dir(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Resolves the target file name: a timestamped default when none is
    /// given, `.png` appended when missing.
    pub fn resolve_filename(filename: Option<&str>) -> StorageResult<String> {
        let Some(name) = filename.map(str::trim).filter(|name| !name.is_empty()) else {
            return Ok(default_filename());
        };
        validate_filename(name)?;
        if name.to_ascii_lowercase().ends_with(PNG_EXTENSION) {
            Ok(name.to_string())
        } else {
            Ok(format!("{name}{PNG_EXTENSION}"))
        }
    }

    pub fn allocate_target_path(&self, filename: Option<&str>) -> StorageResult<ExportedImage> {
        let filename = Self::resolve_filename(filename)?;
        let mut path = self.export_dir.clone();
        path.push(&filename);
        Ok(ExportedImage { path, filename })
    }

    /// Encodes `buffer` as PNG and writes it, replacing any existing file.
    pub fn save(
        &self,
        buffer: &PixelBuffer,
        filename: Option<&str>,
    ) -> StorageResult<ExportedImage> {
        let target = self.allocate_target_path(filename)?;
        let bytes = buffer.to_png()?;
        save_overwrite(&bytes, &target.path)?;
        tracing::info!(
            path = %target.path.display(),
            width = buffer.width(),
            height = buffer.height(),
            "exported canvas"
        );
        Ok(target)
    }
}

fn default_filename() -> String {
    format!(
        "{DEFAULT_FILE_PREFIX}{}{PNG_EXTENSION}",
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

fn validate_filename(name: &str) -> StorageResult<()> {
    let invalid = name.contains(['/', '\\'])
        || name.contains("..")
        || name.chars().any(char::is_control);
    if invalid {
        tracing::warn!(name, "rejected export file name");
        return Err(StorageError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

fn save_overwrite(bytes: &[u8], destination: &Path) -> StorageResult<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(destination, bytes)?;
    Ok(())
}
