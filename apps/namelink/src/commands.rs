//! `namelink match` implementation

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use namelink_core::{MatchConfig, MatchTable, SCORE_COLUMNS};

use crate::MatchArgs;

pub fn run_match(args: &MatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(args)?;
    tracing::debug!("Using config: {:?}", config);

    let left = namelink_io::load_dataset(&args.left)?;
    let right = namelink_io::load_dataset(&args.right)?;

    let table = namelink_core::score(&left, &right, &config)?;

    if table.is_empty() {
        println!("No records matched on {}.", config.join_field);
    } else {
        println!(
            "{}: top {} of {} pairs",
            config.category,
            args.top.min(table.len()),
            table.len()
        );
        println!("{}", render_top(&table, &config, args.top));
    }

    if !args.no_export {
        namelink_io::export_csv(&table, &args.output)?;
        println!("Results written to {}", args.output.display());
    }

    Ok(())
}

/// Config file (or category preset) with command-line overrides applied
fn build_config(args: &MatchArgs) -> Result<MatchConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::for_category(args.category.unwrap_or_default()),
    };

    if let Some(category) = args.category {
        config.category = category;
    }

    if let Some(join_field) = &args.join_field {
        if !config.required_fields.contains(join_field) {
            config.required_fields.push(join_field.clone());
        }
        config.join_field = join_field.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Scored fields from both sides, then the score columns
fn display_columns(table: &MatchTable, config: &MatchConfig) -> Vec<String> {
    let mut columns = Vec::new();
    for field in config.fields.names() {
        let old = format!("{}{}", field, config.left_suffix);
        if table.columns.contains(&old) {
            columns.push(old);
            columns.push(format!("{}{}", field, config.right_suffix));
        } else if table.columns.iter().any(|c| c == field) {
            columns.push(field.to_string());
        }
    }
    columns
}

fn render_top(table: &MatchTable, config: &MatchConfig, n: usize) -> Table {
    let columns = display_columns(table, config);

    let mut header = vec!["#".to_string()];
    header.extend(columns.iter().cloned());
    header.extend(SCORE_COLUMNS.iter().map(|c| c.to_string()));

    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (rank, pair) in table.top(n).iter().enumerate() {
        let mut row = vec![(rank + 1).to_string()];
        row.extend(columns.iter().map(|column| {
            table
                .value(pair, column)
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        row.extend(pair.scores.columns().iter().map(|s| s.to_string()));
        out.add_row(row);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    const HEADER: &str = "State_name,District,Block_Name,Cluster_Name,Cluster_Code,\
                          Village_Code,uniqueid,childname,fathername,socialcategory,gender,age";

    fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        path
    }

    fn args(left: PathBuf, right: PathBuf, output: PathBuf) -> MatchArgs {
        MatchArgs {
            left,
            right,
            category: None,
            config: None,
            join_field: None,
            top: 50,
            output,
            no_export: false,
        }
    }

    #[test]
    fn test_run_match_exports_ranked_results() {
        let dir = tempfile::tempdir().unwrap();
        let left = write_csv(
            dir.path(),
            "d2d.csv",
            &["UP,Bahraich,Mihinpurwa,Motipur,910,101,L1,Mohammad Ali,Abdul Khan,OBC,M,10"],
        );
        let right = write_csv(
            dir.path(),
            "enrolment.csv",
            &[
                "UP,Bahraich,Mihinpurwa,Motipur,910,101,R1,Sita Devi,Ram Lal,SC,F,7",
                "UP,Bahraich,Mihinpurwa,Motipur,910,101,R2,MO ALI,ABDUL KHAN,OBC,M,11",
            ],
        );
        let output = dir.path().join("results.csv");

        run_match(&args(left, right, output.clone())).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("total_score"));
        assert!(lines[1].contains("MO ALI"));
    }

    #[test]
    fn test_run_match_missing_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let left = write_csv(dir.path(), "d2d.csv", &[]);
        let right = dir.path().join("enrolment.csv");
        std::fs::write(&right, "Village_Code,childname\n101,Ravi\n").unwrap();

        let err = run_match(&args(left, right, dir.path().join("out.csv"))).unwrap_err();
        assert!(err.to_string().contains("Second dataset is missing columns"));
    }

    #[test]
    fn test_join_field_override_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(
            dir.path().join("a.csv"),
            dir.path().join("b.csv"),
            dir.path().join("out.csv"),
        );
        args.join_field = Some("Cluster_Code".to_string());
        args.category = Some(namelink_core::MatchCategory::D2dVsGkp);

        let config = build_config(&args).unwrap();
        assert_eq!(config.join_field, "Cluster_Code");
        assert_eq!(config.category, namelink_core::MatchCategory::D2dVsGkp);
        assert_eq!(config.required_fields.len(), 12);
    }

    #[test]
    fn test_display_columns() {
        let config = MatchConfig::default();
        let table = MatchTable {
            columns: vec![
                "Village_Code".to_string(),
                "childname_old1".to_string(),
                "childname_new1".to_string(),
                "gender".to_string(),
            ],
            pairs: Vec::new(),
        };

        assert_eq!(
            display_columns(&table, &config),
            vec!["childname_old1", "childname_new1", "gender"]
        );
    }
}
