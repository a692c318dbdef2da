pub mod budget;
pub mod football;
pub mod index_report;

use thiserror::Error;

use crate::clean::NoTablesFound;
use crate::table::{StructuredTable, Summary};

/// A failure that ends one source's run. The orchestrator records it as a
/// FAIL line and moves on; no error here ever crosses into another source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Raw extraction yielded zero rows for this source.
    #[error("no rows extracted: {0}")]
    ExtractionEmpty(String),

    /// The external table extraction produced zero candidate tables.
    #[error(transparent)]
    NoTables(#[from] NoTablesFound),

    /// The expected structure is absent in a way that prevents locating the
    /// key column. Lesser mismatches degrade gracefully instead.
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),

    /// I/O or other boundary failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// What each source pipeline hands back to the orchestrator.
pub type SourceResult = Result<(StructuredTable, Summary), SourceError>;
