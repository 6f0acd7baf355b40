use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Extracts python snippets from documentation into runnable test modules
#[derive(Parser, Debug)]
#[command(
    name = "docsnip",
    about = "Extract documentation code snippets into runnable test modules",
    version,
    long_about = "docsnip scans an MDX documentation corpus for fenced python blocks, \
                  rewrites placeholder credentials, hosts and resource ids into runtime \
                  lookups, and writes one importable module per document for test runners."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "TOML file overlaid on the environment configuration"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate one test module per document",
        long_about = "Extracts every python block, rewrites placeholders and writes the \
                      generated modules plus an __init__.py into the output directory.\n\n\
                      Examples:\n  \
                      docsnip extract\n  \
                      docsnip extract ./docs -o ./docs/tests/generated\n  \
                      docsnip extract --format json --report report.json"
    )]
    Extract(ExtractArgs),

    #[command(
        about = "List raw blocks for syntax checks",
        long_about = "Lists every surviving block without rewriting it or writing files.\n\n\
                      Examples:\n  \
                      docsnip blocks\n  \
                      docsnip blocks ./docs --ids"
    )]
    Blocks(BlocksArgs),

    #[command(about = "Generate modules and list one execution case per block")]
    Cases(CasesArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(
        value_name = "DOCS_ROOT",
        help = "Documentation corpus root (defaults to configuration)"
    )]
    pub docs_root: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory for generated modules"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "FILE",
        help = "Also write the extraction report as JSON"
    )]
    pub report: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct BlocksArgs {
    #[arg(value_name = "DOCS_ROOT")]
    pub docs_root: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Print only test identifiers")]
    pub ids: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CasesArgs {
    #[arg(value_name = "DOCS_ROOT")]
    pub docs_root: Option<PathBuf>,

    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_extract_args() {
        let args = CliArgs::parse_from(["docsnip", "extract"]);
        match args.command {
            Commands::Extract(extract) => {
                assert!(extract.docs_root.is_none());
                assert!(extract.output_dir.is_none());
                assert!(extract.report.is_none());
                assert_eq!(extract.format, OutputFormatArg::Human);
            }
            _ => panic!("Expected Extract command"),
        }
        assert!(args.config.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_extract_with_options() {
        let args = CliArgs::parse_from([
            "docsnip",
            "extract",
            "/srv/docs",
            "-o",
            "/tmp/gen",
            "--format",
            "json",
            "--report",
            "report.json",
        ]);
        match args.command {
            Commands::Extract(extract) => {
                assert_eq!(extract.docs_root, Some(PathBuf::from("/srv/docs")));
                assert_eq!(extract.output_dir, Some(PathBuf::from("/tmp/gen")));
                assert_eq!(extract.format, OutputFormatArg::Json);
                assert_eq!(extract.report, Some(PathBuf::from("report.json")));
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_blocks_ids_flag() {
        let args = CliArgs::parse_from(["docsnip", "blocks", "docs", "--ids", "-f", "yaml"]);
        match args.command {
            Commands::Blocks(blocks) => {
                assert!(blocks.ids);
                assert_eq!(blocks.format, OutputFormatArg::Yaml);
                assert_eq!(blocks.docs_root, Some(PathBuf::from("docs")));
            }
            _ => panic!("Expected Blocks command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from([
            "docsnip",
            "config",
            "--config",
            "docsnip.toml",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("docsnip.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(matches!(args.command, Commands::Config(_)));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = CliArgs::try_parse_from(["docsnip", "-v", "-q", "cases"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = CliArgs::try_parse_from(["docsnip", "extract", "--format", "dockerfile"]);
        assert!(result.is_err());
    }
}
