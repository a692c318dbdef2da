use once_cell::sync::Lazy;
use regex::Regex;

/// Already a single numeric value: optional sign, then digits with dot or
/// comma separators only.
static CLEAN_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[\d.,]+$").unwrap());

/// One numeric token: digits, optionally a dot and more digits.
static NUMBER_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Normalize locale-formatted numeric text into canonical dot-decimal form:
/// `"1 779 041,93"` becomes `"1779041.93"`.
///
/// Non-breaking spaces and newlines become plain spaces, currency and
/// percent markers are stripped, all remaining whitespace is removed
/// (collapsing thousands-separator spacing) and the decimal comma becomes a
/// dot. The result may still not parse as a number; parsing is the caller's
/// job and unparseable input passes through otherwise unchanged.
pub fn normalize_numeric_text(raw: &str) -> String {
    let spaced = raw.replace('\u{a0}', " ").replace('\n', " ");
    let stripped = spaced.trim().replace("MRU", "").replace('%', "");
    let compact: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();
    compact.replace(',', ".")
}

/// Recover the individual numeric tokens from a cell where several numbers
/// were concatenated without delimiters, e.g. `"122.6124.4125.0"` yields
/// `["122.6", "124.4", "125.0"]`.
///
/// A cell that is already a single clean value (at most one dot) comes back
/// as itself. A cell with no numeric tokens yields an empty vec; callers
/// keep the original value in that case.
pub fn split_joined_numbers(cell: &str) -> Vec<String> {
    let s = cell.trim();
    if CLEAN_NUMBER_RE.is_match(s) && s.matches('.').count() <= 1 {
        return vec![s.to_string()];
    }
    NUMBER_TOKEN_RE
        .find_iter(s)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Which extracted token is authoritative when a cell held several joined
/// values.
///
/// `Last` matches the observed layout of the index report, where earlier
/// tokens are bleed-over from adjacent merged cells. That is a property of
/// one PDF layout, not a general rule, hence the swappable policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvePolicy {
    Last,
    First,
}

impl ResolvePolicy {
    pub fn pick<'a>(&self, tokens: &'a [String]) -> Option<&'a str> {
        match self {
            ResolvePolicy::Last => tokens.last(),
            ResolvePolicy::First => tokens.first(),
        }
        .map(String::as_str)
    }
}
