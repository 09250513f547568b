use super::{AnalysisReport, ReportResult};
use comrak::{markdown_to_html, Options};
use std::fs;
use std::path::Path;
use tracing::info;

const FALLBACK_NOTE: &str =
    "> Structured formatting was unavailable; showing the cleaned model output.";

/// Writes reports as Markdown, or as HTML when the target ends in `.html`
pub struct MarkdownReporter;

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &AnalysisReport) -> String {
        let mut out = String::new();

        out.push_str("# Log Analysis Report\n\n");
        out.push_str(&format!("- **Source:** `{}`\n", report.source.display()));
        out.push_str(&format!("- **Format:** {}\n", report.format));
        out.push_str(&format!("- **Provider:** {}\n", report.provider));
        out.push_str(&format!("- **Model:** {}\n", report.model));
        out.push_str(&format!(
            "- **Generated:** {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str("\n---\n\n");

        if report.is_fallback() {
            out.push_str(FALLBACK_NOTE);
            out.push_str("\n\n");
        }

        out.push_str(report.body().trim_end());
        out.push('\n');
        out
    }

    pub fn render_html(&self, report: &AnalysisReport) -> String {
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;

        let body = markdown_to_html(&self.render(report), &options);
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Log Analysis Report</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            body
        )
    }

    pub fn save_report(&self, report: &AnalysisReport, output_path: &Path) -> ReportResult<()> {
        let is_html = output_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
            .unwrap_or(false);

        let content = if is_html {
            self.render_html(report)
        } else {
            self.render(report)
        };

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, content)?;

        info!("Report written to {}", output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;
    use tempfile::TempDir;

    #[test]
    fn test_render_includes_metadata_and_body() {
        let rendered = MarkdownReporter::new().render(&sample_report(Some("## Findings\n- brute force")));

        assert!(rendered.starts_with("# Log Analysis Report\n"));
        assert!(rendered.contains("- **Source:** `/var/log/auth.csv`"));
        assert!(rendered.contains("- **Format:** csv"));
        assert!(rendered.contains("- **Model:** llama3.2"));
        assert!(rendered.contains("2025-03-01 12:00:00 UTC"));
        assert!(rendered.ends_with("## Findings\n- brute force\n"));
        assert!(!rendered.contains(FALLBACK_NOTE));
    }

    #[test]
    fn test_render_marks_fallback() {
        let rendered = MarkdownReporter::new().render(&sample_report(None));

        assert!(rendered.contains(FALLBACK_NOTE));
        assert!(rendered.contains("## Summary\nBrute force detected"));
    }

    #[test]
    fn test_save_markdown_and_html() {
        let dir = TempDir::new().unwrap();
        let report = sample_report(Some("## Findings\n- brute force"));
        let reporter = MarkdownReporter::new();

        let md_path = dir.path().join("out/report.md");
        reporter.save_report(&report, &md_path).unwrap();
        let md = fs::read_to_string(&md_path).unwrap();
        assert!(md.contains("## Findings"));

        let html_path = dir.path().join("report.html");
        reporter.save_report(&report, &html_path).unwrap();
        let html = fs::read_to_string(&html_path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Findings</h2>"));
        assert!(html.contains("<li>brute force</li>"));
    }
}
