//! namelink-io - Dataset I/O for record linkage
//!
//! This crate loads person datasets and writes ranked match tables:
//!
//! - **CSV / TSV**: delimited text with per-column type inference
//! - **Export**: ranked match tables written back as CSV
//!
//! # Design
//!
//! All readers implement the `DatasetReader` trait for uniform access.
//! Spreadsheet workbooks are recognized by extension and rejected with
//! `IoError::UnsupportedFormat`; convert them to CSV first.

pub mod csv_reader;
pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::*;
pub use schema::*;
pub use writer::*;
