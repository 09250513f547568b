use super::{AnalysisReport, ReportResult};
use colored::{ColoredString, Colorize};

/// Terminal formatting constants
const TERMINAL_WIDTH: usize = 80;
const SEPARATOR_WIDTH: usize = 40;

/// Terminal report generator for console output
pub struct TerminalReporter {
    use_colors: bool,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn report(&self, report: &AnalysisReport) -> ReportResult<()> {
        println!("{}", self.render(report));
        Ok(())
    }

    /// Print the parsed log text before it is sent anywhere
    pub fn print_preview(&self, content: &str, max_lines: usize) {
        println!("\n{}", self.paint("📄 Parsed Log Preview", |s| s.bright_white().bold()));
        println!("{}", self.paint(&"─".repeat(SEPARATOR_WIDTH), |s| s.bright_black()));

        let total = content.lines().count();
        for line in content.lines().take(max_lines) {
            println!("  {}", line);
        }
        if total > max_lines {
            println!(
                "  {}",
                self.paint(&format!("... {} more lines", total - max_lines), |s| s.bright_black())
            );
        }
    }

    pub fn render(&self, report: &AnalysisReport) -> String {
        let mut lines = Vec::new();

        lines.push(String::new());
        lines.push(self.paint(&"═".repeat(TERMINAL_WIDTH), |s| s.bright_blue()));
        lines.push(self.paint("LOG ANALYSIS REPORT", |s| s.bright_white().bold()));
        lines.push(self.paint(&"═".repeat(TERMINAL_WIDTH), |s| s.bright_blue()));

        lines.push(format!("  Source:      {}", self.paint(&report.source.display().to_string(), |s| s.bright_cyan())));
        lines.push(format!("  Format:      {}", report.format));
        lines.push(format!("  Provider:    {}", self.paint(&report.provider, |s| s.bright_cyan())));
        lines.push(format!("  Model:       {}", self.paint(&report.model, |s| s.bright_cyan())));
        lines.push(format!(
            "  Generated:   {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        lines.push(self.paint(&"─".repeat(SEPARATOR_WIDTH), |s| s.bright_black()));

        if report.is_fallback() {
            lines.push(self.paint(
                "⚠ Structured formatting unavailable, showing cleaned response",
                |s| s.bright_yellow(),
            ));
        }
        lines.push(String::new());

        let mut in_code_block = false;
        for line in report.body().lines() {
            if line.trim_start().starts_with("```") {
                in_code_block = !in_code_block;
                lines.push(self.paint(line, |s| s.bright_black()));
                continue;
            }
            if in_code_block {
                lines.push(self.paint(line, |s| s.dimmed()));
            } else {
                lines.push(self.render_line(line));
            }
        }

        lines.push(String::new());
        lines.push(self.paint(&"═".repeat(TERMINAL_WIDTH), |s| s.bright_blue()));
        lines.join("\n")
    }

    fn render_line(&self, line: &str) -> String {
        let trimmed = line.trim_start();

        let level = trimmed.chars().take_while(|c| *c == '#').count();
        if level > 0 && trimmed[level..].starts_with(' ') {
            let title = trimmed[level..].trim();
            return match level {
                1 => format!("\n{}", self.paint(&title.to_uppercase(), |s| s.bright_white().bold().underline())),
                2 => format!("\n{}", self.paint(title, |s| s.bright_white().bold())),
                _ => self.paint(title, |s| s.bright_cyan().bold()),
            };
        }

        let indent = line.len() - trimmed.len();
        for marker in ["- ", "* ", "+ "] {
            if let Some(item) = trimmed.strip_prefix(marker) {
                return format!("{}  {} {}", " ".repeat(indent), self.paint("•", |s| s.bright_yellow()), item);
            }
        }

        line.to_string()
    }

    fn paint<F>(&self, text: &str, style: F) -> String
    where
        F: Fn(&str) -> ColoredString,
    {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}
