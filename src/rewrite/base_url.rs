//! Hardcoded API host → interpolated base URL binding
//!
//! Two disjoint passes. The plain pass handles `"https://host...` string
//! literals that are not f-strings and opens them as f-strings; the
//! interpolated pass handles the host inside an existing `f"..."` literal,
//! including the raw `rf"..."`/`fr"..."` spellings.
//! Both produce `{_EDEN_BASE_URL}` so a host is rewritten exactly once.

use super::RewriteRule;
use crate::config::PlaceholderProfile;
use crate::model::SecretClass;
use regex::{Captures, Regex};

#[derive(Debug, Clone)]
pub struct BaseUrlRule {
    host: String,
    plain_re: Regex,
    interpolated_re: Regex,
    binding: String,
}

impl BaseUrlRule {
    pub fn new(profile: &PlaceholderProfile) -> Result<Self, regex::Error> {
        let host = regex::escape(&profile.placeholder_host);

        Ok(Self {
            host: profile.placeholder_host.clone(),
            plain_re: Regex::new(&format!("\"{}", host))?,
            interpolated_re: Regex::new(&format!(
                "((?:[fF][rR]?|[rR][fF])\"[^\"]*?){}",
                host
            ))?,
            binding: profile.base_url_binding.clone(),
        })
    }

    /// `"https://host/path"` → `f"{BINDING}/path"`, skipping literals
    /// already carrying an `f` prefix.
    pub fn splice_plain_strings(&self, code: &str) -> String {
        let mut out = String::with_capacity(code.len());
        let mut last = 0;

        for m in self.plain_re.find_iter(code) {
            if has_fstring_prefix(&code[..m.start()]) {
                continue;
            }
            out.push_str(&code[last..m.start()]);
            out.push_str(&format!("f\"{{{}}}", self.binding));
            last = m.end();
        }

        out.push_str(&code[last..]);
        out
    }

    /// `f"...https://host..."` → `f"...{BINDING}..."`
    pub fn splice_interpolated_strings(&self, code: &str) -> String {
        self.interpolated_re
            .replace_all(code, |caps: &Captures| format!("{}{{{}}}", &caps[1], self.binding))
            .into_owned()
    }
}

/// True when `before` ends in a string prefix (`f`, `rf`, `Fr`, ...) that
/// makes the following literal an f-string.
fn has_fstring_prefix(before: &str) -> bool {
    let prefix: Vec<char> = before
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    prefix.len() <= 2
        && prefix.iter().any(|c| matches!(c, 'f' | 'F'))
        && prefix.iter().all(|c| matches!(c, 'f' | 'F' | 'r' | 'R'))
}

impl RewriteRule for BaseUrlRule {
    fn name(&self) -> &'static str {
        "base-url"
    }

    fn apply(&self, code: &str, _class: SecretClass) -> String {
        if !code.contains(&self.host) {
            return code.to_string();
        }
        let code = self.splice_plain_strings(code);
        self.splice_interpolated_strings(&code)
    }
}
