//! CSV file reader with type inference

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use namelink_core::{Dataset, Record};

use crate::reader::{DatasetReader, IoError, IoResult};
use crate::schema::{infer_column_type, ColumnDescriptor};

/// CSV file reader
pub struct CsvReader {
    path: String,
    delimiter: u8,
}

impl CsvReader {
    /// Open a comma-separated file
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_options(path, b',')
    }

    /// Open a delimited file with a custom delimiter
    pub fn open_with_options(path: &str, delimiter: u8) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        Ok(Self {
            path: path.to_string(),
            delimiter,
        })
    }
}

impl DatasetReader for CsvReader {
    fn read_dataset(&self) -> IoResult<Dataset> {
        let file = File::open(&self.path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let (dataset, schema) = parse_csv(BufReader::new(file), self.delimiter)?;

        for column in schema.iter().filter(|c| c.nullable) {
            tracing::debug!("{}: column {} has empty cells", self.path, column.name);
        }

        Ok(dataset)
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn format_name(&self) -> &'static str {
        if self.delimiter == b'\t' {
            "TSV"
        } else {
            "CSV"
        }
    }
}

/// Parse delimited text with a header row into a dataset
///
/// Every row is read before types are inferred, so a column is numeric only
/// if all of its non-empty cells are. Empty cells become `Missing`.
pub fn parse_csv<R: Read>(
    input: R,
    delimiter: u8,
) -> IoResult<(Dataset, Vec<ColumnDescriptor>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::InvalidFormat(e.to_string()))?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(IoError::InvalidFormat("missing header row".to_string()));
    }

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(IoError::InvalidFormat(format!(
                "line {}: {} fields, header has {}",
                line,
                record.len(),
                headers.len()
            )));
        }
        rows.push(record);
    }

    let schema: Vec<ColumnDescriptor> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells = rows.iter().map(|row| row.get(i).unwrap_or(""));
            let nullable = cells.clone().any(|c| c.trim().is_empty());
            ColumnDescriptor::new(name.clone(), infer_column_type(cells)).with_nullable(nullable)
        })
        .collect();

    let records = rows
        .iter()
        .map(|row| {
            schema
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = column.dtype.parse(row.get(i).unwrap_or(""));
                    (column.name.clone(), value)
                })
                .collect::<Record>()
        })
        .collect();

    Ok((Dataset::with_records(headers, records), schema))
}
