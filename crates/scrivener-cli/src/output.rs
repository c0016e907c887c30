//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::config::Config;
use crate::error::Result;
use colored::*;
use scrivener_orchestrator::{RunReport, RunState};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => OutputFormat::Text,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(report.to_json()?),
            OutputFormat::Text => Ok(self.format_report_text(report)),
        }
    }

    fn format_report_text(&self, report: &RunReport) -> String {
        let mut lines = vec![report.summary()];

        let rejections: Vec<_> = report
            .audit
            .iter()
            .filter(|entry| entry.status == "rejected")
            .collect();
        if !rejections.is_empty() {
            lines.push(String::new());
            lines.push("Rejected:".to_string());
            for entry in rejections {
                lines.push(format!(
                    "  {} [{}] {}",
                    entry.unit,
                    entry.source.as_deref().unwrap_or("-"),
                    entry.reason.as_deref().unwrap_or("")
                ));
            }
        }

        lines.push(String::new());
        let verdict = format!(
            "Run {} ({:.1}% success)",
            report.state,
            report.success_rate * 100.0
        );
        lines.push(match report.state {
            RunState::Completed => self.success(&verdict),
            _ => self.error(&verdict),
        });
        lines.join("\n")
    }

    /// Format the effective configuration.
    pub fn format_config(&self, config: &Config) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            OutputFormat::Text => config.to_toml(),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrivener_orchestrator::AuditEntry;
    use std::collections::BTreeMap;

    fn report(state: RunState) -> RunReport {
        RunReport {
            run_id: serde_json::from_str("\"0192d1c2-7a6b-7c3d-8e9f-0a1b2c3d4e5f\"").unwrap(),
            state,
            total_units: 2,
            processed: 2,
            applied: 1,
            rejected: 1,
            unchanged: 0,
            cache_hits: 0,
            success_rate: 0.5,
            min_success_rate: 0.8,
            cancelled: false,
            dry_run: false,
            duration_ms: 1200,
            applied_by_source: BTreeMap::from([("dictionary".to_string(), 1)]),
            audit: vec![AuditEntry {
                sequence: 0,
                unit: "body#1".to_string(),
                status: "rejected".to_string(),
                source: Some("llm".to_string()),
                overall: 0.0,
                confidence: "very-low".to_string(),
                issues: vec!["Exception: timeout".to_string()],
                reason: Some("Exception: timeout".to_string()),
                from_cache: false,
                original: "Some text".to_string(),
                candidate: "Some text".to_string(),
                timestamp: 0,
            }],
        }
    }

    #[test]
    fn test_text_report() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let output = formatter.format_report(&report(RunState::Failed)).unwrap();

        assert!(output.contains("Applied: 1"));
        assert!(output.contains("body#1 [llm] Exception: timeout"));
        assert!(output.contains("✗ Run failed (50.0% success)"));
    }

    #[test]
    fn test_json_report() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_report(&report(RunState::Completed)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["state"], "completed");
        assert_eq!(value["applied_by_source"]["dictionary"], 1);
    }

    #[test]
    fn test_config_as_toml() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let output = formatter.format_config(&Config::default()).unwrap();
        assert!(output.contains("[orchestrator]"));
        assert!(output.contains("batch_size = 10"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
