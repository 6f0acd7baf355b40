//! Corpus-wide extraction
//!
//! Walks every document of the configured extension under `<root>/<subtree>`
//! (recursively) and directly in `<root>`, and either writes one generated
//! module per document or lists the raw blocks for syntax checks.

use crate::config::SnippetConfig;
use crate::error::CorpusError;
use crate::fs::{Depth, FileSystem};
use crate::locator::BlockLocator;
use crate::model::{
    CodeBlock, ExtractionReport, IndividualBlock, ModuleRecord, NameCollision,
};
use crate::rewrite::RewritePipeline;
use crate::synth::ModuleSynthesizer;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

const PACKAGE_MARKER: &str = "__init__.py";

pub struct CorpusDriver<F: FileSystem> {
    fs: F,
    config: SnippetConfig,
    locator: BlockLocator,
    pipeline: RewritePipeline,
    synthesizer: ModuleSynthesizer,
}

impl<F: FileSystem> CorpusDriver<F> {
    pub fn new(fs: F, config: SnippetConfig) -> Result<Self, CorpusError> {
        let locator = BlockLocator::new(
            &config.language,
            &config.skip_marker,
            config.lookback_segments,
        )?;
        let pipeline = RewritePipeline::new(&config.profile)?;
        let synthesizer = ModuleSynthesizer::new(&config.profile);

        debug!(
            docs_root = %config.docs_root.display(),
            language = %config.language,
            rules = ?pipeline.rule_names(),
            "CorpusDriver initialized"
        );

        Ok(Self {
            fs,
            config,
            locator,
            pipeline,
            synthesizer,
        })
    }

    pub fn config(&self) -> &SnippetConfig {
        &self.config
    }

    /// Sorted, de-duplicated document paths
    pub fn discover_documents(&self) -> Result<Vec<PathBuf>, CorpusError> {
        let root = &self.config.docs_root;
        if !self.fs.exists(root) {
            return Err(CorpusError::MissingRoot(root.clone()));
        }
        if !self.fs.is_dir(root) {
            return Err(CorpusError::NotADirectory(root.clone()));
        }

        let discover = |dir: &Path, depth: Depth| {
            self.fs
                .list_files(dir, &self.config.extension, depth)
                .map_err(|e| CorpusError::Discover {
                    root: dir.to_path_buf(),
                    source: e.into(),
                })
        };

        let mut documents = discover(&root.join(&self.config.subtree), Depth::Recursive)?;
        documents.extend(discover(root, Depth::Shallow)?);
        documents.sort();
        documents.dedup();

        debug!(count = documents.len(), "Documents discovered");
        Ok(documents)
    }

    /// Corpus-relative, `/`-separated name of a discovered document
    pub fn source_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.config.docs_root).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Reads one document and returns its surviving raw blocks
    pub fn locate_blocks(&self, path: &Path) -> Result<Vec<CodeBlock>, CorpusError> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| CorpusError::read(path, e))?;
        Ok(self.locator.locate(&content))
    }

    /// Creates the output directory and its package marker, leaving an
    /// existing marker untouched.
    pub fn ensure_output_dir(&self) -> Result<(), CorpusError> {
        let dir = &self.config.output_dir;
        self.fs
            .create_dir_all(dir)
            .map_err(|e| CorpusError::write(dir, e))?;

        let marker = dir.join(PACKAGE_MARKER);
        if !self.fs.exists(&marker) {
            self.fs
                .write_string(&marker, "")
                .map_err(|e| CorpusError::write(&marker, e))?;
            debug!(path = %marker.display(), "Created package marker");
        }
        Ok(())
    }

    /// Writes one generated module per document with at least one block
    pub fn extract_all(&self) -> Result<ExtractionReport, CorpusError> {
        let start = Instant::now();
        info!(
            docs_root = %self.config.docs_root.display(),
            output_dir = %self.config.output_dir.display(),
            "Extracting snippets"
        );

        let documents = self.discover_documents()?;
        self.ensure_output_dir()?;

        let mut report = ExtractionReport::default();
        let mut owners: HashMap<String, String> = HashMap::new();

        for path in documents {
            let blocks = self.locate_blocks(&path)?;
            let source = self.source_name(&path);
            if blocks.is_empty() {
                debug!(source = %source, "No blocks, skipping");
                continue;
            }

            let class = self.config.profile.secret_class_for(&source);
            let rewritten: Vec<CodeBlock> = blocks
                .iter()
                .map(|b| CodeBlock {
                    code: self.pipeline.rewrite(&b.code, class),
                    line: b.line,
                })
                .collect();

            let Some(unit) = self.synthesizer.synthesize(&source, &rewritten, class) else {
                continue;
            };

            let module_name = sanitize_module_name(&source, &self.config.extension);
            let generated_path = self.config.output_dir.join(format!("{}.py", module_name));

            if let Some(previous) = owners.insert(module_name.clone(), source.clone()) {
                warn!(
                    module = %module_name,
                    overwritten = %previous,
                    winner = %source,
                    "Generated module name collision"
                );
                report.collisions.push(NameCollision {
                    module_name: module_name.clone(),
                    overwritten: previous,
                    winner: source.clone(),
                });
            }

            self.fs
                .write_string(&generated_path, &unit.code)
                .map_err(|e| CorpusError::write(&generated_path, e))?;

            debug!(
                source = %source,
                module = %module_name,
                blocks = blocks.len(),
                secret_class = %class,
                "Generated module"
            );

            let has_input = unit.requires_interactive_input();
            report.modules.push(ModuleRecord {
                source,
                module_name,
                generated_path,
                snippet_count: blocks.len(),
                has_input,
                secret_class: class,
                blocks,
                block_functions: unit.functions,
            });
        }

        info!(
            documents = report.modules.len(),
            snippets = report.total_snippets(),
            collisions = report.collisions.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extraction complete"
        );

        Ok(report)
    }

    /// Flat listing of raw blocks, without rewriting or writing anything
    pub fn extract_individual_blocks(&self) -> Result<Vec<IndividualBlock>, CorpusError> {
        let mut listing = Vec::new();

        for path in self.discover_documents()? {
            let source = self.source_name(&path);
            for (block_index, block) in self.locate_blocks(&path)?.into_iter().enumerate() {
                listing.push(IndividualBlock {
                    source: source.clone(),
                    code: block.code,
                    line: block.line,
                    block_index,
                });
            }
        }

        debug!(blocks = listing.len(), "Individual blocks listed");
        Ok(listing)
    }
}

/// Maps a corpus-relative document path to an importable module name.
///
/// `v3/how-to/text-features.mdx` → `v3_how_to_text_features`
pub fn sanitize_module_name(source: &str, extension: &str) -> String {
    let mut name = source
        .replace(['/', '\\', '-'], "_")
        .replace(&format!(".{}", extension), "");

    name = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
