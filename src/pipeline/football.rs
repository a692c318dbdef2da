//! Football results connector.
//!
//! The results page groups match cards under standalone date labels, so the
//! DOM is walked in document order carrying the current date, the way a
//! reader scans the page. Scores come from the live-score widget when
//! present; upcoming matches have none and are marked SCHEDULED.

use std::collections::HashSet;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::pipeline::{SourceError, SourceResult};
use crate::table::{Cell, StructuredTable};

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d{2}/\d{2}/\d{4})\s*$").unwrap());
static SCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*-\s*(\d+)").unwrap());

const HEADER: &[&str] = &[
    "match_date",
    "home_team",
    "away_team",
    "home_score",
    "away_score",
    "status",
];

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn to_iso_date(ddmmyyyy: &str) -> Option<String> {
    NaiveDate::parse_from_str(ddmmyyyy.trim(), "%d/%m/%Y")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn extract_teams(card: &ElementRef) -> (Option<String>, Option<String>) {
    let home_sel = Selector::parse(r#"[data-testid="team-name-badge"] .text-right"#)
        .expect("invalid home-team selector");
    let away_sel = Selector::parse(r#"[data-testid="team-name-badge"] .text-left"#)
        .expect("invalid away-team selector");

    let home = card
        .select(&home_sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty());
    let away = card
        .select(&away_sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty());
    (home, away)
}

fn parse_score(card: &ElementRef) -> (Option<u32>, Option<u32>, &'static str) {
    let box_sel = Selector::parse(r#"[data-testid="live-score-element"]"#)
        .expect("invalid score-box selector");
    let span_sel = Selector::parse("span").expect("invalid span selector");

    let Some(score_box) = card.select(&box_sel).next() else {
        return (None, None, "SCHEDULED");
    };

    let nums: Vec<u32> = score_box
        .select(&span_sel)
        .filter_map(|sp| {
            let t = element_text(&sp);
            if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()) {
                t.parse().ok()
            } else {
                None
            }
        })
        .collect();
    if nums.len() >= 2 {
        return (Some(nums[0]), Some(nums[1]), "PLAYED");
    }

    // Fallback on the widget's flattened text.
    let txt = element_text(&score_box);
    if let Some(caps) = SCORE_RE.captures(&txt) {
        let home = caps[1].parse().ok();
        let away = caps[2].parse().ok();
        if home.is_some() && away.is_some() {
            return (home, away, "PLAYED");
        }
    }

    (None, None, "SCHEDULED")
}

/// Walk the results page in document order and build one row per match
/// card, deduplicated on (date, home, away) keeping the first occurrence.
pub fn extract_football_results(html: &str, source_url: &str, scraped_at: &str) -> SourceResult {
    let doc = Html::parse_document(html);

    let mut current_date: Option<String> = None;
    let mut seen: HashSet<(Option<String>, String, String)> = HashSet::new();
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for node in doc.tree.root().descendants() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };

        // Standalone date labels between match groups set the current date.
        let name = el.value().name();
        if matches!(name, "div" | "span" | "h3" | "h4" | "p") {
            let text = element_text(&el);
            if let Some(caps) = DATE_RE.captures(&text) {
                current_date = to_iso_date(&caps[1]);
                continue;
            }
        }

        if el.value().attr("data-testid") != Some("match-card") {
            continue;
        }

        let (home, away) = extract_teams(&el);
        let (Some(home), Some(away)) = (home, away) else {
            // Card markup varies; skip rather than emit half a match.
            continue;
        };

        if !seen.insert((current_date.clone(), home.clone(), away.clone())) {
            continue;
        }

        let (home_score, away_score, status) = parse_score(&el);
        rows.push(vec![
            current_date
                .clone()
                .map(Cell::Text)
                .unwrap_or(Cell::Missing),
            Cell::Text(home),
            Cell::Text(away),
            home_score.map(|n| Cell::Number(n as f64)).unwrap_or(Cell::Missing),
            away_score.map(|n| Cell::Number(n as f64)).unwrap_or(Cell::Missing),
            Cell::text(status),
        ]);
    }

    if rows.is_empty() {
        return Err(SourceError::ExtractionEmpty(
            "no match cards found on results page".into(),
        ));
    }

    let header = HEADER.iter().map(|h| h.to_string()).collect();
    let table = StructuredTable::new(header, rows).with_provenance(source_url, scraped_at);
    let summary = table.summary();
    tracing::info!(rows = summary.row_count, "football results extracted");
    Ok((table, summary))
}
