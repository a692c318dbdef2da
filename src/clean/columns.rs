use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NON_ALNUM_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Turn arbitrary header text into a stable identifier-safe key:
/// lowercase, accents folded to ASCII, every run of other characters
/// collapsed to a single underscore.
///
/// `"Déc-24 (%)"` becomes `"dec_24"`; blank input becomes `"col"`.
/// Pure and idempotent. Uniqueness across a table's columns is not
/// enforced here; callers needing unique keys append a positional suffix.
pub fn normalize_column_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    // NFKD then drop anything non-ASCII, which removes the combining marks.
    let folded: String = lowered.nfkd().filter(char::is_ascii).collect();
    let keyed = NON_ALNUM_RUN_RE.replace_all(&folded, "_");
    let keyed = keyed.trim_matches('_');
    if keyed.is_empty() {
        "col".to_string()
    } else {
        keyed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_punctuation() {
        assert_eq!(normalize_column_name("Déc-24 (%)"), "dec_24");
        assert_eq!(normalize_column_name("Fonction"), "fonction");
        assert_eq!(normalize_column_name("  Variation / 1 an  "), "variation_1_an");
    }

    #[test]
    fn blank_input_falls_back_to_col() {
        assert_eq!(normalize_column_name(""), "col");
        assert_eq!(normalize_column_name("   "), "col");
        assert_eq!(normalize_column_name("--"), "col");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["Déc-24 (%)", "poids", "", "Variation sur 12 mois"] {
            let once = normalize_column_name(raw);
            assert_eq!(normalize_column_name(&once), once);
        }
    }

    #[test]
    fn numeric_labels_survive() {
        assert_eq!(normalize_column_name("0"), "0");
        assert_eq!(normalize_column_name("11"), "11");
    }
}
