use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::LedgerRow;
use crate::report::MemberSummary;

/// Writes the reconciliation output as a pair of CSV files: the granular
/// unpaid-item ledger at the configured path, and the per-member summary as
/// a `_summary` sibling.
pub struct CsvReportSink {
    path: PathBuf,
}

impl CsvReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn summary_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("report");

        self.path.with_file_name(format!("{stem}_summary.csv"))
    }

    /// Writes both files. Returns `None` without touching disk when the
    /// ledger is empty.
    pub fn write(&self, ledger: &[LedgerRow], summary: &[MemberSummary]) -> Result<Option<&Path>> {
        if ledger.is_empty() {
            return Ok(None);
        }

        let mut detail_writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("could not create report file {}", self.path.display()))?;

        for row in ledger {
            detail_writer.serialize(row)?;
        }
        detail_writer.flush()?;

        let summary_path = self.summary_path();
        let mut summary_writer = csv::Writer::from_path(&summary_path)
            .with_context(|| format!("could not create summary file {}", summary_path.display()))?;

        for entry in summary {
            summary_writer.serialize(entry)?;
        }
        summary_writer.flush()?;

        info!("Summary written to {}", summary_path.display());

        Ok(Some(&self.path))
    }
}
