//! Subcommand handlers; each returns the process exit code

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, Level};

use super::commands::{BlocksArgs, CasesArgs, CliArgs, ConfigArgs, ExtractArgs};
use super::output::OutputFormatter;
use crate::config::SnippetConfig;
use crate::corpus::CorpusDriver;
use crate::fs::RealFileSystem;
use crate::util::logging::parse_level;

/// Level picked by `--log-level`, `-v` or `-q`, otherwise the configured
/// `log_level` (config file over `DOCSNIP_LOG_LEVEL`).
///
/// An unreadable config file falls back to the environment; the subcommand
/// reports the file error itself once logging is up.
pub fn resolve_log_level(args: &CliArgs) -> Level {
    if let Some(level) = &args.log_level {
        return parse_level(level);
    }
    if args.verbose {
        return Level::DEBUG;
    }
    if args.quiet {
        return Level::ERROR;
    }

    let config = args
        .config
        .as_deref()
        .and_then(|path| SnippetConfig::from_file(path).ok())
        .unwrap_or_default();
    parse_level(&config.log_level)
}

/// Environment configuration, overlaid with `config_file`, then with the
/// command-line corpus root and output directory.
pub fn load_config(
    config_file: Option<&Path>,
    docs_root: Option<&PathBuf>,
    output_dir: Option<&PathBuf>,
) -> Result<SnippetConfig> {
    let mut config = match config_file {
        Some(path) => SnippetConfig::from_file(path)?,
        None => SnippetConfig::default(),
    };

    if let Some(root) = docs_root {
        config = config.with_docs_root(root.clone());
    }
    if let Some(dir) = output_dir {
        config = config.with_output_dir(dir.clone());
    }

    config.validate()?;
    debug!(config = ?config.to_display_map(), "Configuration loaded");
    Ok(config)
}

fn driver(config: SnippetConfig) -> Result<CorpusDriver<RealFileSystem>> {
    Ok(CorpusDriver::new(RealFileSystem::new(), config)?)
}

fn emit(output: &str) {
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

fn exit_code(command: &str, result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!(command, "{:#}", e);
            1
        }
    }
}

pub fn handle_extract(args: &ExtractArgs, config_file: Option<&Path>, quiet: bool) -> i32 {
    exit_code("extract", run_extract(args, config_file, quiet))
}

fn run_extract(args: &ExtractArgs, config_file: Option<&Path>, quiet: bool) -> Result<()> {
    let config = load_config(config_file, args.docs_root.as_ref(), args.output_dir.as_ref())?;
    let language = config.language.clone();
    let report = driver(config)?.extract_all()?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize extraction report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Report written");
    }

    if !quiet {
        let formatter = OutputFormatter::new(args.format.into());
        emit(&formatter.format_report(&report, &language)?);
    }
    Ok(())
}

pub fn handle_blocks(args: &BlocksArgs, config_file: Option<&Path>) -> i32 {
    exit_code("blocks", run_blocks(args, config_file))
}

fn run_blocks(args: &BlocksArgs, config_file: Option<&Path>) -> Result<()> {
    let config = load_config(config_file, args.docs_root.as_ref(), None)?;
    let blocks = driver(config)?.extract_individual_blocks()?;

    let formatter = OutputFormatter::new(args.format.into());
    emit(&formatter.format_blocks(&blocks, args.ids)?);
    Ok(())
}

pub fn handle_cases(args: &CasesArgs, config_file: Option<&Path>) -> i32 {
    exit_code("cases", run_cases(args, config_file))
}

fn run_cases(args: &CasesArgs, config_file: Option<&Path>) -> Result<()> {
    let config = load_config(config_file, args.docs_root.as_ref(), args.output_dir.as_ref())?;
    let report = driver(config)?.extract_all()?;

    let formatter = OutputFormatter::new(args.format.into());
    emit(&formatter.format_cases(&report.execution_cases())?);
    Ok(())
}

pub fn handle_config(args: &ConfigArgs, config_file: Option<&Path>) -> i32 {
    exit_code("config", run_config(args, config_file))
}

fn run_config(args: &ConfigArgs, config_file: Option<&Path>) -> Result<()> {
    let config = load_config(config_file, None, None)?;
    let formatter = OutputFormatter::new(args.format.into());
    emit(&formatter.format_config(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_cli_paths_override_config_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("docsnip.toml");
        fs::write(&file, "docs_root = \"corpus\"\nlanguage = \"py\"\n").unwrap();

        let from_file = load_config(Some(&file), None, None).unwrap();
        assert_eq!(from_file.docs_root, temp.path().join("corpus"));
        assert_eq!(from_file.language, "py");

        let root = PathBuf::from("/srv/docs");
        let out = PathBuf::from("/tmp/generated");
        let overridden = load_config(Some(&file), Some(&root), Some(&out)).unwrap();
        assert_eq!(overridden.docs_root, root);
        assert_eq!(overridden.output_dir, out);
        assert_eq!(overridden.language, "py");
    }

    #[test]
    #[serial]
    fn test_invalid_config_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("docsnip.toml");
        fs::write(&file, "lookback_segments = 0\n").unwrap();

        assert!(load_config(Some(&file), None, None).is_err());
    }

    fn cli(args: &[&str]) -> CliArgs {
        use clap::Parser;
        CliArgs::parse_from(std::iter::once("docsnip").chain(args.iter().copied()))
    }

    #[test]
    #[serial]
    fn test_log_level_from_config_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("docsnip.toml");
        fs::write(&file, "log_level = \"debug\"\n").unwrap();
        let file = file.to_str().unwrap();

        assert_eq!(resolve_log_level(&cli(&["--config", file, "config"])), Level::DEBUG);
        assert_eq!(
            resolve_log_level(&cli(&["--config", file, "-q", "config"])),
            Level::ERROR
        );
        assert_eq!(
            resolve_log_level(&cli(&["--config", file, "--log-level", "warn", "config"])),
            Level::WARN
        );
    }

    #[test]
    #[serial]
    fn test_log_level_flags_without_config_file() {
        assert_eq!(resolve_log_level(&cli(&["-v", "config"])), Level::DEBUG);
        assert_eq!(resolve_log_level(&cli(&["--log-level", "trace", "config"])), Level::TRACE);
    }

    #[test]
    #[serial]
    fn test_missing_root_exits_nonzero() {
        let temp = TempDir::new().unwrap();
        let args = BlocksArgs {
            docs_root: Some(temp.path().join("missing")),
            format: super::super::commands::OutputFormatArg::Json,
            ids: true,
        };

        assert_eq!(handle_blocks(&args, None), 1);
    }
}
