//! Dataset reader trait and common types
//!
//! The `DatasetReader` trait provides a uniform interface for loading
//! person datasets from the supported file formats.

use std::path::Path;

use namelink_core::Dataset;
use thiserror::Error;

use crate::csv_reader::CsvReader;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to write output: {0}")]
    Write(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for loading a tabular person dataset
pub trait DatasetReader: Send + Sync {
    /// Read the whole file into a dataset
    fn read_dataset(&self) -> IoResult<Dataset>;

    /// Get the file path
    fn path(&self) -> &str;

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn DatasetReader>;

/// Open a file and return an appropriate reader
///
/// The format is auto-detected from the file extension.
pub fn open_dataset(path: impl AsRef<Path>) -> IoResult<BoxedReader> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(Box::new(CsvReader::open(&display)?)),
        "tsv" | "tab" => Ok(Box::new(CsvReader::open_with_options(&display, b'\t')?)),
        "xls" | "xlsx" | "xlsm" | "ods" => Err(IoError::UnsupportedFormat(format!(
            "{}: spreadsheet workbooks are not read directly, export the sheet to CSV",
            display
        ))),
        _ => Err(IoError::InvalidFormat(format!(
            "Unknown file extension: {}",
            extension
        ))),
    }
}

/// Open and read a dataset in one step
pub fn load_dataset(path: impl AsRef<Path>) -> IoResult<Dataset> {
    let reader = open_dataset(path)?;
    let dataset = reader.read_dataset()?;

    tracing::info!(
        "Loaded {} rows x {} columns from {} ({})",
        dataset.len(),
        dataset.columns.len(),
        reader.path(),
        reader.format_name()
    );

    Ok(dataset)
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    vec!["csv", "tsv", "tab"]
}
