//! Fenced code block discovery
//!
//! Finds every ```` ```<lang> ```` block in a document, optionally followed by a
//! single label token on the fence line, and closed by a line holding only the
//! backtick marker (leading whitespace allowed). A block is dropped when the skip
//! annotation appears in the last few newline-delimited segments before its
//! opening fence.

use crate::model::CodeBlock;
use regex::Regex;
use std::borrow::Cow;

/// Locates fenced blocks of one language tag
#[derive(Debug, Clone)]
pub struct BlockLocator {
    block_re: Regex,
    skip_re: Regex,
    lookback_segments: usize,
}

impl BlockLocator {
    /// Builds a locator for `language`, skipping blocks whose preceding
    /// `lookback_segments` segments match `skip_marker`.
    pub fn new(
        language: &str,
        skip_marker: &str,
        lookback_segments: usize,
    ) -> Result<Self, regex::Error> {
        let block_re = Regex::new(&format!(
            r"(?ms)^```{}(?:[ \t]+\S+)?[ \t]*\n(.*?)^\s*```",
            regex::escape(language)
        ))?;
        let skip_re = Regex::new(skip_marker)?;

        Ok(Self {
            block_re,
            skip_re,
            lookback_segments,
        })
    }

    /// Returns the surviving blocks of `content` in document order.
    ///
    /// `\r\n` and lone `\r` line endings are read as `\n`.
    pub fn locate(&self, content: &str) -> Vec<CodeBlock> {
        let content = normalize_newlines(content);
        let content = content.as_ref();
        let mut blocks = Vec::new();

        for caps in self.block_re.captures_iter(content) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let preceding = &content[..whole.start()];

            if self.is_skipped(preceding) {
                continue;
            }

            blocks.push(CodeBlock {
                code: body.as_str().to_string(),
                line: preceding.matches('\n').count() + 2,
            });
        }

        blocks
    }

    /// The match starts at a line boundary, so the last segment is the (empty)
    /// fence-line prefix and the rest are the lines directly above the fence.
    fn is_skipped(&self, preceding: &str) -> bool {
        preceding
            .rsplit('\n')
            .take(self.lookback_segments)
            .any(|segment| self.skip_re.is_match(segment))
    }
}

fn normalize_newlines(content: &str) -> Cow<'_, str> {
    if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(content)
    }
}
