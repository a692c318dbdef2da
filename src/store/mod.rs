//! Persisted outputs and their readers: per-source CSVs, the machine
//! summary (kpi.json), the human run report, and the extractor's candidate
//! tables. These formats are the system's only persisted state, so the
//! writers stick to UTF-8, comma delimiters, a header row and dot-decimal
//! floats.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;

use crate::table::{Cell, RawTable, StructuredTable};

/// Write a table as UTF-8 CSV with a header row. Missing cells become
/// empty fields; numbers render dot-decimal.
pub fn write_table_csv(table: &StructuredTable, path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(&table.header)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|c| c.render()))?;
    }
    wtr.flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Read a serialized table back as text cells, empty fields becoming
/// missing. Feeds the second cleaning pass from the first pass's output.
pub fn read_table_csv(path: &Path) -> Result<StructuredTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut records = rdr.records();
    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|s| s.to_string()).collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.with_context(|| format!("reading {}", path.display()))?;
        let row: Vec<Cell> = record
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Cell::Missing
                } else {
                    Cell::Text(s.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(StructuredTable::new(header, rows))
}

/// Load the external PDF extractor's candidate tables from JSON.
pub fn read_candidate_tables(path: &Path) -> Result<Vec<RawTable>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading candidate tables {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("parsing candidate tables {}", path.display()))
}

/// Write the aggregated machine-readable summary, pretty-printed with a
/// trailing newline.
pub fn write_kpi<T: Serialize>(path: &Path, kpi: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(kpi).context("serializing kpi")?;
    fs::write(path, format!("{}\n", json))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Write the human-readable run report, one line per entry.
pub fn write_run_report(path: &Path, lines: &[String]) -> Result<()> {
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Summary;
    use tempfile::tempdir;

    #[test]
    fn csv_round_trip_preserves_shape_and_blanks() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("t.csv");

        let table = StructuredTable::new(
            vec!["code".into(), "poids".into()],
            vec![
                vec![Cell::Text("01".into()), Cell::Number(12.5)],
                vec![Cell::Text("02".into()), Cell::Missing],
            ],
        );
        write_table_csv(&table, &path)?;

        let back = read_table_csv(&path)?;
        assert_eq!(back.header, vec!["code", "poids"]);
        assert_eq!(back.rows[0][1], Cell::Text("12.5".into()));
        assert_eq!(back.rows[1][1], Cell::Missing);
        assert_eq!(
            back.summary(),
            Summary {
                row_count: 2,
                missing_value_count: 1
            }
        );
        Ok(())
    }

    #[test]
    fn candidate_tables_load_from_json() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("tables.json");
        fs::write(
            &path,
            r#"[{"rows": [["Tableau 2", ""], ["01", "133.2"]]}, {"rows": []}]"#,
        )?;

        let tables = read_candidate_tables(&path)?;
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows[1][0], "01");
        Ok(())
    }

    #[test]
    fn kpi_json_is_pretty_with_trailing_newline() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("kpi.json");

        #[derive(Serialize)]
        struct Kpi {
            rows: usize,
        }
        write_kpi(&path, &Kpi { rows: 3 })?;

        let text = fs::read_to_string(&path)?;
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"rows\": 3"));
        Ok(())
    }
}
