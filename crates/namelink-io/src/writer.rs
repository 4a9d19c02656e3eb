//! Match table export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use namelink_core::MatchTable;

use crate::reader::{IoError, IoResult};

/// Default file name for exported results
pub const DEFAULT_EXPORT_FILE: &str = "fuzzy_matching_results.csv";

/// Write every pair of a match table as CSV, in ranked order
///
/// The header is the data columns followed by the score columns. Missing
/// values are written as empty cells.
pub fn write_match_table<W: Write>(table: &MatchTable, writer: W) -> IoResult<()> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(table.header())
        .map_err(|e| IoError::Write(e.to_string()))?;

    for pair in &table.pairs {
        out.write_record(table.row(pair))
            .map_err(|e| IoError::Write(e.to_string()))?;
    }

    out.flush().map_err(|e| IoError::Write(e.to_string()))
}

/// Write a match table to a CSV file, replacing any existing file
pub fn export_csv(table: &MatchTable, path: impl AsRef<Path>) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| IoError::Write(format!("{}: {}", path.display(), e)))?;

    write_match_table(table, BufWriter::new(file))?;
    tracing::info!("Exported {} pairs to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::parse_csv;
    use namelink_core::{FieldScores, FieldValue, MatchedPair};

    fn table() -> MatchTable {
        let pair = |name: &str, points: u32| MatchedPair {
            left_index: 0,
            right_index: 0,
            values: vec![FieldValue::Integer(101), FieldValue::text(name), FieldValue::Missing],
            scores: FieldScores {
                child_name: points,
                ..FieldScores::default()
            },
        };

        MatchTable {
            columns: vec![
                "Village_Code".to_string(),
                "childname_old1".to_string(),
                "note".to_string(),
            ],
            pairs: vec![pair("Ravi, Kumar", 400), pair("Sita", 200)],
        }
    }

    #[test]
    fn test_write_match_table() {
        let mut buffer = Vec::new();
        write_match_table(&table(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "Village_Code,childname_old1,note,childname_score,fathername_score,\
                 gender_score,age_score,soc_cat_score,total_score"
            )
        );
        assert_eq!(lines.next(), Some("101,\"Ravi, Kumar\",,400,0,0,0,0,400"));
        assert_eq!(lines.next(), Some("101,Sita,,200,0,0,0,0,200"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        export_csv(&table(), &path).unwrap();

        let file = File::open(&path).unwrap();
        let (dataset, _) = parse_csv(file, b',').unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.records[0].get("childname_old1"),
            &FieldValue::text("Ravi, Kumar")
        );
        assert_eq!(
            dataset.records[1].get("total_score"),
            &FieldValue::Integer(200)
        );
    }
}
