//! Two-pass cleaning of the INPC price-index table pulled out of the
//! monthly PDF report.
//!
//! Pass one turns the extractor's raw candidate grids into a typed table:
//! select the target table, recover a header, normalize names and numbers,
//! drop repeated headers, coerce columns, attach provenance. Pass two runs
//! on the serialized output of pass one and applies the report-specific
//! structure: semantic column names, the two-digit function-code filter and
//! joined-value repair.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::clean::{
    coerce_named_columns, coerce_numeric_columns, drop_repeated_headers, looks_like_header,
    normalize_column_name, normalize_numeric_text, select_target_table, split_joined_numbers,
    CleanConfig, ResolvePolicy,
};
use crate::pipeline::{SourceError, SourceResult};
use crate::table::{Cell, RawTable, StructuredTable};

/// Captions identifying the target table among the extractor's candidates.
static TABLE2_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\btableau\s*2\b").unwrap(),
        Regex::new(r"(?i)\btab\.\s*2\b").unwrap(),
    ]
});

/// Title and label fragments that mark non-data rows in the first column.
static TITLE_EXCLUDE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Tableau2|Fonctions").unwrap());

/// Main rows of the report carry a two-digit function code.
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}$").unwrap());

static WS_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Positional rename of the extractor's column indices to semantic names.
/// Index 6 is absent on purpose: that grid column holds bleed-over from the
/// merged month cells and has no semantic counterpart.
const COLUMN_RENAMES: &[(&str, &str)] = &[
    ("0", "code"),
    ("1", "fonction"),
    ("2", "poids"),
    ("3", "dec_24"),
    ("4", "sept_25"),
    ("5", "oct_25"),
    ("7", "dec_25"),
    ("8", "var_1m"),
    ("9", "var_3m"),
    ("10", "var_1an"),
    ("11", "var_12m"),
];

/// Month columns that suffer joined values in the extracted grid.
const JOINED_VALUE_COLUMNS: &[&str] = &["dec_24", "sept_25", "oct_25", "dec_25"];

const NUMERIC_COLUMNS: &[&str] = &["poids", "dec_24", "sept_25", "oct_25", "dec_25"];

const FINAL_COLUMNS: &[&str] = &[
    "code",
    "fonction",
    "poids",
    "dec_24",
    "sept_25",
    "oct_25",
    "dec_25",
    "var_1m",
    "var_3m",
    "var_1an",
    "var_12m",
    "source_url",
    "scraped_at",
];

/// First pass: raw extractor candidates to a typed table with provenance.
pub fn extract_index_table(
    tables: &[RawTable],
    source_url: &str,
    scraped_at: &str,
    cfg: &CleanConfig,
) -> SourceResult {
    let chosen = select_target_table(tables, &TABLE2_PATTERNS)?;
    tracing::debug!(candidates = tables.len(), "selected target table");

    let width = chosen.width();
    let mut rows: Vec<Vec<String>> = chosen
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row
                .iter()
                .map(|c| c.replace('\n', " ").trim().to_string())
                .collect();
            cells.resize(width, String::new());
            cells
        })
        .collect();
    rows.retain(|r| r.iter().any(|c| !c.is_empty()));

    // Fix the header: take row 0 when it reads like labels, else fall back
    // to the extractor's positional column indices.
    let header_labels: Vec<String> = if rows.len() >= 2 && looks_like_header(&rows[0], cfg) {
        rows.remove(0)
    } else {
        (0..width).map(|i| i.to_string()).collect()
    };
    let header: Vec<String> = header_labels
        .iter()
        .map(|h| normalize_column_name(h))
        .collect();

    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| r.into_iter().map(|c| normalize_numeric_text(&c)).collect())
        .collect();

    let table = StructuredTable::from_text_rows(header, rows);
    let table = drop_repeated_headers(&table);
    let table = coerce_numeric_columns(&table, cfg);
    let table = table.with_provenance(source_url, scraped_at);
    let summary = table.summary();
    tracing::info!(rows = summary.row_count, missing = summary.missing_value_count, "index table extracted");
    Ok((table, summary))
}

/// Second pass, run on the serialized first-pass output: structural cleanup
/// down to the report's main rows with semantic column names.
///
/// Every step degrades gracefully on missing columns by projecting only
/// what exists, except when the function-code column itself cannot be
/// located — without the key column the result would be meaningless.
pub fn clean_index_table(
    table: &StructuredTable,
    policy: ResolvePolicy,
) -> Result<StructuredTable, SourceError> {
    let mut out = table.clone();

    out.rows
        .retain(|r| r.iter().any(|c| !c.render().trim().is_empty()));

    if !out.header.is_empty() {
        out.rows
            .retain(|r| !TITLE_EXCLUDE_RE.is_match(&r[0].render()));
    }

    for h in &mut out.header {
        if let Some((_, to)) = COLUMN_RENAMES.iter().find(|(from, _)| from == h) {
            *h = (*to).to_string();
        }
    }

    let code_idx = out.column_index("code").ok_or_else(|| {
        SourceError::StructuralMismatch("code column not found after renaming".into())
    })?;
    for row in &mut out.rows {
        row[code_idx] = Cell::Text(row[code_idx].render().trim().to_string());
    }
    out.rows
        .retain(|r| CODE_RE.is_match(&r[code_idx].render()));

    if let Some(label_idx) = out.column_index("fonction") {
        for row in &mut out.rows {
            let collapsed = WS_RUN_RE
                .replace_all(&row[label_idx].render(), " ")
                .trim()
                .to_string();
            row[label_idx] = Cell::Text(collapsed);
        }
    }

    for name in JOINED_VALUE_COLUMNS {
        let Some(idx) = out.column_index(name) else {
            continue;
        };
        for row in &mut out.rows {
            if row[idx].is_missing() {
                continue;
            }
            let text = row[idx].render();
            let tokens = split_joined_numbers(&text);
            if let Some(value) = policy.pick(&tokens) {
                row[idx] = Cell::Text(value.to_string());
            }
        }
    }

    let out = coerce_named_columns(&out, NUMERIC_COLUMNS);

    let keep: Vec<usize> = FINAL_COLUMNS
        .iter()
        .filter_map(|n| out.column_index(n))
        .collect();
    let header: Vec<String> = keep.iter().map(|&i| out.header[i].clone()).collect();
    let rows: Vec<Vec<Cell>> = out
        .rows
        .iter()
        .map(|r| keep.iter().map(|&i| r[i].clone()).collect())
        .collect();
    Ok(StructuredTable { header, rows })
}
