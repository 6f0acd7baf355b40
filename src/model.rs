//! Records produced by snippet extraction
//!
//! These types are the whole interface between the extractor and the test
//! runners that consume it. Everything here is plain data: serializable,
//! comparable, and rebuilt from scratch on every extraction pass.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which runtime secret a document's generated code must reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretClass {
    Sandbox,
    Production,
}

impl SecretClass {
    pub fn is_production(self) -> bool {
        self == SecretClass::Production
    }
}

impl fmt::Display for SecretClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretClass::Sandbox => write!(f, "sandbox"),
            SecretClass::Production => write!(f, "production"),
        }
    }
}

/// A fenced code block as found in its document, before any rewriting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Raw block body, without the fences
    pub code: String,
    /// 1-based line of the first code line (the fence sits on `line - 1`)
    pub line: usize,
}

/// One block in the flat listing used for stand-alone syntax checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualBlock {
    /// Corpus-relative document path, `/`-separated
    pub source: String,
    pub code: String,
    pub line: usize,
    /// 0-based position of the block within its document
    pub block_index: usize,
}

impl IndividualBlock {
    /// Test identifier of the form `<document>:L<line>[<index>]`
    pub fn test_id(&self) -> String {
        format!("{}:L{}[{}]", self.source, self.line, self.block_index)
    }
}

/// Name of the generated callable for the `number`-th block (1-based)
pub fn block_function_name(number: usize) -> String {
    format!("block_{}", number)
}

/// Metadata for one generated per-block callable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFunction {
    pub name: String,
    /// 1-based block number within the document
    pub block_number: usize,
    pub source_line: usize,
    /// Whether the rewritten body waits on `input(`
    pub requires_interactive_input: bool,
    pub secret_class: SecretClass,
}

/// A synthesized module for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub source: String,
    pub code: String,
    pub functions: Vec<BlockFunction>,
}

impl GeneratedUnit {
    pub fn requires_interactive_input(&self) -> bool {
        self.functions.iter().any(|f| f.requires_interactive_input)
    }
}

/// Per-document result of `extract_all`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub source: String,
    pub module_name: String,
    pub generated_path: PathBuf,
    pub snippet_count: usize,
    pub has_input: bool,
    pub secret_class: SecretClass,
    pub blocks: Vec<CodeBlock>,
    pub block_functions: Vec<BlockFunction>,
}

impl ModuleRecord {
    /// Test identifiers of the form `<document>::block[<n>]`, one per callable
    pub fn test_ids(&self) -> Vec<String> {
        self.block_functions
            .iter()
            .map(|f| format!("{}::block[{}]", self.source, f.block_number))
            .collect()
    }
}

/// Two documents whose sanitized names coincide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCollision {
    pub module_name: String,
    /// Document whose generated file was overwritten
    pub overwritten: String,
    /// Document that now owns the generated file
    pub winner: String,
}

/// One executable test case: a single block callable in a generated module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionCase {
    pub source: String,
    pub module_name: String,
    pub function: String,
    pub block_numbers: Vec<usize>,
    pub lines: Vec<usize>,
    pub has_input: bool,
    pub secret_class: SecretClass,
}

impl ExecutionCase {
    pub fn test_id(&self) -> String {
        let numbers: Vec<String> = self.block_numbers.iter().map(|n| n.to_string()).collect();
        format!("{}::block[{}]", self.source, numbers.join(","))
    }
}

/// Result of a full extraction pass, owned by whoever asked for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub modules: Vec<ModuleRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<NameCollision>,
}

impl ExtractionReport {
    pub fn total_snippets(&self) -> usize {
        self.modules.iter().map(|m| m.snippet_count).sum()
    }

    pub fn interactive_documents(&self) -> Vec<&str> {
        self.modules
            .iter()
            .filter(|m| m.has_input)
            .map(|m| m.source.as_str())
            .collect()
    }

    /// Flattens modules into one case per generated block callable
    pub fn execution_cases(&self) -> Vec<ExecutionCase> {
        self.modules
            .iter()
            .flat_map(|module| {
                module.block_functions.iter().map(move |f| ExecutionCase {
                    source: module.source.clone(),
                    module_name: module.module_name.clone(),
                    function: f.name.clone(),
                    block_numbers: vec![f.block_number],
                    lines: vec![f.source_line],
                    has_input: f.requires_interactive_input,
                    secret_class: f.secret_class,
                })
            })
            .collect()
    }
}
