//! API key placeholders → runtime secret lookups

use super::RewriteRule;
use crate::config::PlaceholderProfile;
use crate::model::SecretClass;
use regex::{Captures, NoExpand, Regex};

/// Shape of a credential placeholder and what it becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `f"Bearer YOUR_API_KEY"` or `"Bearer YOUR_API_KEY"`
    BearerHeader,
    /// `"YOUR_API_KEY"` used as a value, or `os.getenv("EDEN_AI_API_KEY")`
    SecretValue,
}

/// Rewrites literal API keys into `os.environ[...]` lookups of the secret
/// selected by the document's class.
#[derive(Debug, Clone)]
pub struct CredentialRule {
    shapes: Vec<(Regex, Shape)>,
    key_assignment_re: Regex,
    key_definition_re: Regex,
    key_usage_re: Regex,
    profile: PlaceholderProfile,
}

impl CredentialRule {
    pub fn new(profile: &PlaceholderProfile) -> Result<Self, regex::Error> {
        let placeholders = profile
            .key_placeholders
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let key = regex::escape(&profile.key_variable);

        // Order matters: the f-string form must be consumed before the plain one.
        let shapes = vec![
            (
                Regex::new(&format!(r#"f"Bearer\s+(?:{})""#, placeholders))?,
                Shape::BearerHeader,
            ),
            (
                Regex::new(&format!(r#""Bearer\s+(?:{})""#, placeholders))?,
                Shape::BearerHeader,
            ),
            (
                Regex::new(&format!(r#""(?:{})""#, placeholders))?,
                Shape::SecretValue,
            ),
            (
                Regex::new(&format!(
                    r#"os\.(?:getenv|environ\.get)\(\s*"{}"\s*\)"#,
                    regex::escape(&profile.legacy_key_env_var)
                ))?,
                Shape::SecretValue,
            ),
        ];

        Ok(Self {
            shapes,
            key_assignment_re: Regex::new(&format!(r#"(?m)^([ \t]*){}[ \t]*=[ \t]*"[^"\n]*""#, key))?,
            key_definition_re: Regex::new(&format!(r"(?m)^[ \t]*{}[ \t]*=(?:[^=]|$)", key))?,
            key_usage_re: Regex::new(&format!(r"\b{}\b", key))?,
            profile: profile.clone(),
        })
    }

    /// Replaces every occurrence of the four placeholder shapes
    pub fn substitute_placeholders(&self, code: &str, class: SecretClass) -> String {
        let var = self.profile.token_var(class);
        let bearer = format!("f\"Bearer {{os.environ['{}']}}\"", var);
        let lookup = format!("os.environ[\"{}\"]", var);

        let mut code = code.to_string();
        for (re, shape) in &self.shapes {
            let replacement = match shape {
                Shape::BearerHeader => bearer.as_str(),
                Shape::SecretValue => lookup.as_str(),
            };
            code = re.replace_all(&code, NoExpand(replacement)).into_owned();
        }
        code
    }

    /// Points the key variable at the runtime secret.
    ///
    /// Rewrites the first `KEY = "..."` assignment, or prepends a definition
    /// when the block uses the variable without ever assigning it.
    pub fn bind_key_variable(&self, code: &str, class: SecretClass) -> String {
        let lookup = format!("os.environ[\"{}\"]", self.profile.token_var(class));

        if self.key_assignment_re.is_match(code) {
            return self
                .key_assignment_re
                .replacen(code, 1, |caps: &Captures| {
                    format!("{}{} = {}", &caps[1], self.profile.key_variable, lookup)
                })
                .into_owned();
        }

        if self.key_usage_re.is_match(code) && !self.key_definition_re.is_match(code) {
            return format!("{} = {}\n{}", self.profile.key_variable, lookup, code);
        }

        code.to_string()
    }
}

impl RewriteRule for CredentialRule {
    fn name(&self) -> &'static str {
        "credentials"
    }

    fn apply(&self, code: &str, class: SecretClass) -> String {
        let code = self.substitute_placeholders(code, class);
        self.bind_key_variable(&code, class)
    }
}
