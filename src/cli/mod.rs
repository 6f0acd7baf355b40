pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{BlocksArgs, CasesArgs, CliArgs, Commands, ConfigArgs, ExtractArgs};
pub use output::{OutputFormat, OutputFormatter};
