use once_cell::sync::Lazy;
use regex::Regex;

use crate::clean::CleanConfig;
use crate::table::{Cell, StructuredTable};

static NUMERIC_VALUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

fn numeric_like(cell: &Cell) -> bool {
    match cell {
        Cell::Number(_) => true,
        Cell::Text(s) => NUMERIC_VALUE_RE.is_match(s.trim()),
        Cell::Missing => false,
    }
}

fn cast_cell(cell: &Cell) -> Cell {
    match cell {
        Cell::Number(n) => Cell::Number(*n),
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(Cell::Number)
            .unwrap_or(Cell::Missing),
        Cell::Missing => Cell::Missing,
    }
}

/// Decide per column whether to cast to numeric, based on the proportion of
/// numeric-looking values over all rows (empty cells count against).
///
/// A column at or above the threshold is cast whole: cells that fail to
/// parse individually become missing, which is expected and tolerated.
/// Columns below the threshold are left as text, untouched.
pub fn coerce_numeric_columns(table: &StructuredTable, cfg: &CleanConfig) -> StructuredTable {
    let mut out = table.clone();
    if out.rows.is_empty() {
        return out;
    }

    let total = out.rows.len() as f64;
    for col in 0..out.header.len() {
        let matching = out.rows.iter().filter(|r| numeric_like(&r[col])).count() as f64;
        if matching / total >= cfg.numeric_column_ratio {
            for row in &mut out.rows {
                row[col] = cast_cell(&row[col]);
            }
        }
    }
    out
}

/// Cast the named columns to numeric unconditionally, parse failures
/// becoming missing. Names not present are skipped.
pub fn coerce_named_columns(table: &StructuredTable, names: &[&str]) -> StructuredTable {
    let mut out = table.clone();
    for name in names {
        if let Some(col) = out.column_index(name) {
            for row in &mut out.rows {
                row[col] = cast_cell(&row[col]);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_column(values: &[&str]) -> StructuredTable {
        StructuredTable::from_text_rows(
            vec!["v".into()],
            values.iter().map(|v| vec![v.to_string()]).collect(),
        )
    }

    #[test]
    fn column_above_threshold_is_cast_with_per_cell_misses() {
        let out = coerce_numeric_columns(&one_column(&["12.3", "45", "n/a"]), &CleanConfig::default());
        assert_eq!(
            out.rows.iter().map(|r| r[0].clone()).collect::<Vec<_>>(),
            vec![Cell::Number(12.3), Cell::Number(45.0), Cell::Missing]
        );
    }

    #[test]
    fn column_below_threshold_stays_text() {
        let out = coerce_numeric_columns(&one_column(&["a", "b", "12"]), &CleanConfig::default());
        assert_eq!(out.rows[0][0], Cell::Text("a".into()));
        assert_eq!(out.rows[2][0], Cell::Text("12".into()));
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        // 3 of 5 = 0.6 exactly.
        let table = one_column(&["1", "2", "3", "x", "y"]);
        let cast = coerce_numeric_columns(&table, &CleanConfig::default());
        assert_eq!(cast.rows[0][0], Cell::Number(1.0));

        let stricter = CleanConfig {
            numeric_column_ratio: 0.61,
            ..CleanConfig::default()
        };
        let kept = coerce_numeric_columns(&table, &stricter);
        assert_eq!(kept.rows[0][0], Cell::Text("1".into()));
    }

    #[test]
    fn negative_and_integer_forms_count_as_numeric() {
        let out = coerce_numeric_columns(&one_column(&["-1.5", "7", "0.0"]), &CleanConfig::default());
        assert_eq!(out.rows[0][0], Cell::Number(-1.5));
    }

    #[test]
    fn named_coercion_ignores_the_threshold() {
        let table = StructuredTable::from_text_rows(
            vec!["poids".into(), "fonction".into()],
            vec![
                vec!["12.5".into(), "Alimentation".into()],
                vec!["oui".into(), "Transports".into()],
            ],
        );
        let out = coerce_named_columns(&table, &["poids", "absent"]);
        assert_eq!(out.rows[0][0], Cell::Number(12.5));
        assert_eq!(out.rows[1][0], Cell::Missing);
        assert_eq!(out.rows[0][1], Cell::Text("Alimentation".into()));
    }
}
