pub mod coerce;
pub mod columns;
pub mod header;
pub mod numeric;
pub mod select;

pub use coerce::{coerce_named_columns, coerce_numeric_columns};
pub use columns::normalize_column_name;
pub use header::{drop_repeated_headers, looks_like_header};
pub use numeric::{normalize_numeric_text, split_joined_numbers, ResolvePolicy};
pub use select::{select_target_table, NoTablesFound};

/// Heuristic thresholds for the cleaning passes.
///
/// Exposed as named configuration so the contracts are testable at their
/// boundaries rather than buried as literals.
#[derive(Debug, Clone, Copy)]
pub struct CleanConfig {
    /// A candidate header row must have a digit-bearing cell ratio below
    /// this to be accepted as a header.
    pub header_digit_ratio: f64,
    /// A column is cast to numeric when at least this fraction of its
    /// values fully parse as numbers.
    pub numeric_column_ratio: f64,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            header_digit_ratio: 0.5,
            numeric_column_ratio: 0.6,
        }
    }
}
