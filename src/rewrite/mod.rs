//! Placeholder rewriting
//!
//! Each rule is a pure text transform parameterized only by the document's
//! [`SecretClass`]. The pipeline applies them in a fixed order: credentials,
//! resource identifier, base URL. A missing pattern is a no-op; no rule fails.

pub mod base_url;
pub mod credentials;
pub mod resource_id;

pub use base_url::BaseUrlRule;
pub use credentials::CredentialRule;
pub use resource_id::ResourceIdRule;

use crate::config::PlaceholderProfile;
use crate::model::SecretClass;

/// A single text rewrite over one block
pub trait RewriteRule: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn apply(&self, code: &str, class: SecretClass) -> String;
}

/// Rules composed in their fixed application order
pub struct RewritePipeline {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl RewritePipeline {
    pub fn new(profile: &PlaceholderProfile) -> Result<Self, regex::Error> {
        let rules: Vec<Box<dyn RewriteRule>> = vec![
            Box::new(CredentialRule::new(profile)?),
            Box::new(ResourceIdRule::new(profile)),
            Box::new(BaseUrlRule::new(profile)?),
        ];
        Ok(Self { rules })
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn rewrite(&self, code: &str, class: SecretClass) -> String {
        self.rules
            .iter()
            .fold(code.to_string(), |code, rule| rule.apply(&code, class))
    }
}

impl std::fmt::Debug for RewritePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewritePipeline")
            .field("rules", &self.rule_names())
            .finish()
    }
}
