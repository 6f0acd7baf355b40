//! Output formatting for JSON, YAML and human-readable text

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::SnippetConfig;
use crate::model::{ExecutionCase, ExtractionReport, IndividualBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// A record paired with its test identifier
#[derive(Serialize)]
struct Identified<'a, T: Serialize> {
    id: String,
    #[serde(flatten)]
    record: &'a T,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats an extraction report. `language` names the snippets in the
    /// human summary.
    pub fn format_report(&self, report: &ExtractionReport, language: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize extraction report to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(report)
                .context("Failed to serialize extraction report to YAML"),
            OutputFormat::Human => Ok(self.format_report_human(report, language)),
        }
    }

    pub fn format_blocks(&self, blocks: &[IndividualBlock], ids_only: bool) -> Result<String> {
        if ids_only {
            return Ok(join_lines(blocks.iter().map(|b| b.test_id())));
        }

        let records: Vec<_> = blocks
            .iter()
            .map(|b| Identified {
                id: b.test_id(),
                record: b,
            })
            .collect();

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&records)
                .context("Failed to serialize blocks to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&records).context("Failed to serialize blocks to YAML")
            }
            OutputFormat::Human => Ok(self.format_blocks_human(blocks)),
        }
    }

    pub fn format_cases(&self, cases: &[ExecutionCase]) -> Result<String> {
        let records: Vec<_> = cases
            .iter()
            .map(|c| Identified {
                id: c.test_id(),
                record: c,
            })
            .collect();

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&records)
                .context("Failed to serialize execution cases to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&records)
                .context("Failed to serialize execution cases to YAML"),
            OutputFormat::Human => Ok(join_lines(cases.iter().map(|c| {
                let mut line = format!("{}  {}.{}", c.test_id(), c.module_name, c.function);
                if c.has_input {
                    line.push_str("  [input]");
                }
                if c.secret_class.is_production() {
                    line.push_str("  [production]");
                }
                line
            }))),
        }
    }

    pub fn format_config(&self, config: &SnippetConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config.to_display_map())
                .context("Failed to serialize config to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_report_human(&self, report: &ExtractionReport, language: &str) -> String {
        let mut output = format!(
            "Extracted {} {} snippets from {} documents\n",
            report.total_snippets(),
            language,
            report.modules.len()
        );

        for module in &report.modules {
            let plural = if module.snippet_count == 1 { "" } else { "s" };
            output.push_str(&format!(
                "  {} -> {}.py ({} block{})",
                module.source, module.module_name, module.snippet_count, plural
            ));
            if module.has_input {
                output.push_str(" [input]");
            }
            if module.secret_class.is_production() {
                output.push_str(" [production]");
            }
            output.push('\n');
        }

        let interactive = report.interactive_documents();
        if !interactive.is_empty() {
            output.push_str(&format!(
                "\nDocuments waiting on input(): {}\n",
                interactive.join(", ")
            ));
        }

        if !report.collisions.is_empty() {
            output.push_str("\nName collisions:\n");
            for collision in &report.collisions {
                output.push_str(&format!(
                    "  {}: {} overwritten by {}\n",
                    collision.module_name, collision.overwritten, collision.winner
                ));
            }
        }

        output
    }

    fn format_blocks_human(&self, blocks: &[IndividualBlock]) -> String {
        let mut output = String::new();
        for block in blocks {
            let lines = block.code.lines().count();
            output.push_str(&format!("{}  ({} lines)\n", block.test_id(), lines));
        }
        output.push_str(&format!("{} blocks\n", blocks.len()));
        output
    }
}

fn join_lines(lines: impl Iterator<Item = String>) -> String {
    let mut output = String::new();
    for line in lines {
        output.push_str(&line);
        output.push('\n');
    }
    output
}
