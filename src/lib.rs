//! docsnip - documentation snippet extraction for executable doc tests
//!
//! Mines fenced code blocks out of an MDX documentation corpus, rewrites the
//! placeholder credentials, hosts and resource ids they contain into runtime
//! lookups, and synthesizes one importable module per document with a callable
//! per block. The metadata records returned alongside are what external test
//! runners parametrize over.
//!
//! # Example
//!
//! ```no_run
//! use docsnip::{CorpusDriver, RealFileSystem, SnippetConfig};
//! use std::path::PathBuf;
//!
//! let config = SnippetConfig::default().with_docs_root(PathBuf::from("docs"));
//! let driver = CorpusDriver::new(RealFileSystem::new(), config)?;
//!
//! let report = driver.extract_all()?;
//! for case in report.execution_cases() {
//!     println!("{}", case.test_id());
//! }
//! # Ok::<(), docsnip::CorpusError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`locator`]: fenced block discovery with skip annotations
//! - [`rewrite`]: placeholder rewrite rules and their pipeline
//! - [`synth`]: generated module synthesis
//! - [`corpus`]: corpus walking, output layout and metadata

pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod fs;
pub mod locator;
pub mod model;
pub mod rewrite;
pub mod synth;
pub mod util;

pub use config::{ConfigError, PlaceholderProfile, SnippetConfig};
pub use corpus::{sanitize_module_name, CorpusDriver};
pub use error::CorpusError;
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use locator::BlockLocator;
pub use model::{
    BlockFunction, CodeBlock, ExecutionCase, ExtractionReport, GeneratedUnit, IndividualBlock,
    ModuleRecord, NameCollision, SecretClass,
};
pub use rewrite::{RewritePipeline, RewriteRule};
pub use synth::ModuleSynthesizer;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
