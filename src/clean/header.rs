use crate::clean::CleanConfig;
use crate::table::StructuredTable;

/// Decide whether a candidate row is a textual header rather than data.
///
/// Header labels are mostly alphabetic; data rows are mostly numeric. A row
/// with fewer than two non-empty cells carries too little information and is
/// never taken as a header. Heuristic, so false calls are possible on rows
/// with highly textual data.
pub fn looks_like_header(row: &[String], cfg: &CleanConfig) -> bool {
    let non_empty: Vec<&str> = row
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if non_empty.len() < 2 {
        return false;
    }
    let with_digit = non_empty
        .iter()
        .filter(|v| v.chars().any(|c| c.is_ascii_digit()))
        .count();
    (with_digit as f64) / (non_empty.len() as f64) < cfg.header_digit_ratio
}

/// Remove body rows that duplicate the header labels, as page-broken PDF
/// tables repeat them mid-body.
///
/// A row is a repeat when its lowercased cells equal the header exactly, or
/// when at least `max(2, header_len / 2)` positions agree on a non-empty
/// label. The majority rule can false-positive on data rows that genuinely
/// share several labels with the header (e.g. repeated categorical values);
/// known limitation.
pub fn drop_repeated_headers(table: &StructuredTable) -> StructuredTable {
    if table.rows.is_empty() {
        return table.clone();
    }

    let header: Vec<String> = table
        .header
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let threshold = std::cmp::max(2, header.len() / 2);

    let rows = table
        .rows
        .iter()
        .filter(|row| {
            let vals: Vec<String> = row
                .iter()
                .map(|c| c.render().trim().to_lowercase())
                .collect();
            if vals == header {
                return false;
            }
            let same = vals
                .iter()
                .zip(&header)
                .filter(|(a, b)| a == b && !a.is_empty())
                .count();
            same < threshold
        })
        .cloned()
        .collect();

    StructuredTable {
        header: table.header.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn textual_row_is_a_header() {
        let cfg = CleanConfig::default();
        assert!(looks_like_header(&row(&["Fonction", "Poids"]), &cfg));
    }

    #[test]
    fn numeric_row_is_not_a_header() {
        let cfg = CleanConfig::default();
        assert!(!looks_like_header(&row(&["12", "34.5"]), &cfg));
    }

    #[test]
    fn single_cell_is_never_a_header() {
        let cfg = CleanConfig::default();
        assert!(!looks_like_header(&row(&["x"]), &cfg));
        assert!(!looks_like_header(&row(&["Tableau 2", "", ""]), &cfg));
        assert!(!looks_like_header(&[], &cfg));
    }

    #[test]
    fn ratio_threshold_is_configurable() {
        // One of two cells carries a digit: ratio 0.5.
        let r = row(&["Fonction", "Dec-24"]);
        let strict = CleanConfig {
            header_digit_ratio: 0.5,
            ..CleanConfig::default()
        };
        assert!(!looks_like_header(&r, &strict));
        let lenient = CleanConfig {
            header_digit_ratio: 0.6,
            ..CleanConfig::default()
        };
        assert!(looks_like_header(&r, &lenient));
    }

    #[test]
    fn exact_repeat_of_header_is_dropped_in_order() {
        let table = StructuredTable::from_text_rows(
            vec!["code".into(), "fonction".into()],
            vec![
                row(&["01", "Alimentation"]),
                row(&["code", "fonction"]),
                row(&["02", "Boissons"]),
            ],
        );
        let out = drop_repeated_headers(&table);
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[0][0], Cell::Text("01".into()));
        assert_eq!(out.rows[1][0], Cell::Text("02".into()));
    }

    #[test]
    fn majority_match_counts_as_repeat() {
        // 3 of 4 labels agree, threshold is max(2, 4 / 2) = 2.
        let table = StructuredTable::from_text_rows(
            vec!["code".into(), "fonction".into(), "poids".into(), "dec_24".into()],
            vec![row(&["CODE", "Fonction", "poids", "133.2"])],
        );
        assert!(drop_repeated_headers(&table).rows.is_empty());
    }

    #[test]
    fn empty_positions_do_not_count_toward_the_majority() {
        let table = StructuredTable::from_text_rows(
            vec!["".into(), "".into(), "poids".into(), "dec_24".into()],
            vec![row(&["", "", "12.5", "133.2"])],
        );
        // Only the two empty positions agree, and those are ignored.
        assert_eq!(drop_repeated_headers(&table).rows.len(), 1);
    }

    #[test]
    fn empty_table_is_returned_unchanged() {
        let table = StructuredTable::from_text_rows(vec!["a".into()], vec![]);
        assert_eq!(drop_repeated_headers(&table), table);
    }
}
