use docsnip::cli::commands::{CliArgs, Commands};
use docsnip::cli::handlers::{
    handle_blocks, handle_cases, handle_config, handle_extract, resolve_log_level,
};
use docsnip::util::logging::{self, LoggingConfig};
use docsnip::VERSION;

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("docsnip v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let config_file = args.config.as_deref();
    let exit_code = match &args.command {
        Commands::Extract(extract_args) => handle_extract(extract_args, config_file, args.quiet),
        Commands::Blocks(blocks_args) => handle_blocks(blocks_args, config_file),
        Commands::Cases(cases_args) => handle_cases(cases_args, config_file),
        Commands::Config(config_args) => handle_config(config_args, config_file),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    logging::init_logging(LoggingConfig {
        level: resolve_log_level(args),
        use_json: logging::json_requested(),
        ..Default::default()
    });
}
