//! Report generation port trait.

use std::path::Path;

use crate::domain::error::TrackerError;
use crate::domain::holdings::Holding;
use crate::domain::metrics::Summary;
use crate::domain::performance::PerformanceResult;
use crate::domain::tracker::TrackerConfig;

/// Everything a report renders, borrowed from a finished run.
pub struct Report<'a> {
    pub config: &'a TrackerConfig,
    pub result: &'a PerformanceResult,
    pub holdings: &'a [Holding],
    pub summary: &'a Summary,
}

/// Port for writing tracker reports.
pub trait ReportPort {
    fn write(&self, report: &Report<'_>, output: &Path) -> Result<(), TrackerError>;
}
