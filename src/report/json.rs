use super::{AnalysisReport, ReportResult};
use std::fs;
use std::path::Path;

/// JSON report generator
pub struct JsonReporter;

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &AnalysisReport) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    pub fn save_report(&self, report: &AnalysisReport, output_path: &Path) -> ReportResult<()> {
        fs::write(output_path, self.render(report)?)?;
        Ok(())
    }
}
