//! Budget-execution dashboard connector.
//!
//! The dashboard is a JS-rendered data table; rendering happens outside
//! this crate and the connector consumes the resulting DOM. Single-pass
//! extraction plus light normalization: header cells, body rows, locale
//! numeric cleanup, column typing, provenance.

use scraper::{Html, Selector};

use crate::clean::{coerce_numeric_columns, normalize_numeric_text, CleanConfig};
use crate::pipeline::{SourceError, SourceResult};
use crate::table::StructuredTable;

/// Extract and normalize the budget table from rendered dashboard HTML.
pub fn extract_budget_table(
    html: &str,
    source_url: &str,
    scraped_at: &str,
    cfg: &CleanConfig,
) -> SourceResult {
    let doc = Html::parse_document(html);
    let th_sel = Selector::parse("thead tr th").expect("invalid header selector");
    let tr_sel = Selector::parse("tbody.p-datatable-tbody tr").expect("invalid row selector");
    let td_sel = Selector::parse("td").expect("invalid cell selector");

    let mut headers: Vec<String> = doc
        .select(&th_sel)
        .map(|th| th.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let rows: Vec<Vec<String>> = doc
        .select(&tr_sel)
        .map(|tr| {
            tr.select(&td_sel)
                .map(|td| td.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect();

    if rows.is_empty() {
        return Err(SourceError::ExtractionEmpty(
            "budget table rendered but no rows extracted".into(),
        ));
    }

    // Header fallback when the rendered table carries no labels; the header
    // is trimmed or padded to the first row's width.
    let width = rows[0].len();
    headers.truncate(width);
    while headers.len() < width {
        headers.push(format!("col_{}", headers.len() + 1));
    }

    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| r.into_iter().map(|c| normalize_numeric_text(&c)).collect())
        .collect();

    let table = StructuredTable::from_text_rows(headers, rows);
    let table = coerce_numeric_columns(&table, cfg);
    let table = table.with_provenance(source_url, scraped_at);
    let summary = table.summary();
    tracing::info!(rows = summary.row_count, "budget table extracted");
    Ok((table, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    const PAGE: &str = r#"
        <table>
          <thead><tr><th>Rubrique</th><th>Montant</th><th>Taux</th></tr></thead>
          <tbody class="p-datatable-tbody">
            <tr class="ng-star-inserted"><td>Fonctionnement</td><td>1 779 041,93 MRU</td><td>12,4 %</td></tr>
            <tr class="ng-star-inserted"><td>Investissement</td><td>903 210,00 MRU</td><td>7,1 %</td></tr>
          </tbody>
        </table>"#;

    #[test]
    fn extracts_and_normalizes_the_rendered_table() {
        let (table, summary) = extract_budget_table(
            PAGE,
            "https://services.tresor.mr/budget",
            "2026-01-05T10:00:00+00:00",
            &CleanConfig::default(),
        )
        .unwrap();

        assert_eq!(summary.row_count, 2);
        assert_eq!(
            table.header,
            vec!["Rubrique", "Montant", "Taux", "source_url", "scraped_at"]
        );
        assert_eq!(table.rows[0][1], Cell::Number(1779041.93));
        assert_eq!(table.rows[0][2], Cell::Number(12.4));
        assert_eq!(table.rows[1][1], Cell::Number(903210.0));
        assert_eq!(table.rows[0][0], Cell::Text("Fonctionnement".into()));
    }

    #[test]
    fn missing_header_falls_back_to_positional_labels() {
        let page = r#"
            <table><tbody class="p-datatable-tbody">
              <tr><td>a</td><td>1</td></tr>
            </tbody></table>"#;
        let (table, _) =
            extract_budget_table(page, "u", "t", &CleanConfig::default()).unwrap();
        assert_eq!(
            table.header,
            vec!["col_1", "col_2", "source_url", "scraped_at"]
        );
    }

    #[test]
    fn empty_body_is_extraction_empty() {
        let page = r#"<table><tbody class="p-datatable-tbody"></tbody></table>"#;
        let err = extract_budget_table(page, "u", "t", &CleanConfig::default()).unwrap_err();
        assert!(matches!(err, SourceError::ExtractionEmpty(_)));
    }
}
