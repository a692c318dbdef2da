use regex::Regex;
use thiserror::Error;

use crate::table::RawTable;

/// The external table extraction produced zero candidates. Distinct from
/// "pattern not found", which has a positional fallback.
#[derive(Debug, Error)]
#[error("no candidate tables produced by the extractor")]
pub struct NoTablesFound;

/// Pick the table matching one of the target patterns from the extractor's
/// candidates.
///
/// Each candidate's cells are flattened into one search string; the first
/// candidate (in input order) matching any pattern wins. When no candidate
/// matches — extractors regularly miss the caption row — fall back to the
/// second table if there are at least two, else the first.
pub fn select_target_table<'a>(
    tables: &'a [RawTable],
    patterns: &[Regex],
) -> Result<&'a RawTable, NoTablesFound> {
    if tables.is_empty() {
        return Err(NoTablesFound);
    }

    for table in tables {
        let joined = table.flattened_text();
        if patterns.iter().any(|p| p.is_match(&joined)) {
            return Ok(table);
        }
    }

    Ok(tables.get(1).unwrap_or(&tables[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(caption: &str) -> RawTable {
        RawTable::new(vec![
            vec![caption.to_string(), String::new()],
            vec!["01".into(), "133.2".into()],
        ])
    }

    fn patterns() -> Vec<Regex> {
        vec![
            Regex::new(r"(?i)\btableau\s*2\b").unwrap(),
            Regex::new(r"(?i)\btab\.\s*2\b").unwrap(),
        ]
    }

    #[test]
    fn first_matching_table_wins() {
        let tables = vec![table("Tableau 1"), table("TABLEAU 2 : INPC"), table("Tableau 3")];
        let chosen = select_target_table(&tables, &patterns()).unwrap();
        assert!(chosen.flattened_text().contains("TABLEAU 2"));
    }

    #[test]
    fn no_match_falls_back_to_second_table() {
        let tables = vec![table("Annexe"), table("Autre")];
        let chosen = select_target_table(&tables, &patterns()).unwrap();
        assert!(chosen.flattened_text().contains("Autre"));
    }

    #[test]
    fn single_unmatched_table_is_returned() {
        let tables = vec![table("Annexe")];
        let chosen = select_target_table(&tables, &patterns()).unwrap();
        assert!(chosen.flattened_text().contains("Annexe"));
    }

    #[test]
    fn empty_input_is_a_distinct_error() {
        assert!(select_target_table(&[], &patterns()).is_err());
    }

    #[test]
    fn abbreviated_caption_matches_too() {
        let tables = vec![table("Tableau 1"), table("voir Tab. 2 ci-dessous"), table("x")];
        let chosen = select_target_table(&tables, &patterns()).unwrap();
        assert!(chosen.flattened_text().contains("Tab. 2"));
    }
}
