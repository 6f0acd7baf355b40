//! Placeholder resource identifier → runtime binding

use super::RewriteRule;
use crate::config::PlaceholderProfile;
use crate::model::SecretClass;

/// Replaces the quoted placeholder UUID with a bare reference to the
/// module-level binding populated by fixture setup.
#[derive(Debug, Clone)]
pub struct ResourceIdRule {
    placeholder: String,
    quoted: [String; 2],
    binding: String,
}

impl ResourceIdRule {
    pub fn new(profile: &PlaceholderProfile) -> Self {
        let id = &profile.placeholder_resource_id;
        Self {
            placeholder: id.clone(),
            quoted: [format!("\"{}\"", id), format!("'{}'", id)],
            binding: profile.resource_id_binding.clone(),
        }
    }
}

impl RewriteRule for ResourceIdRule {
    fn name(&self) -> &'static str {
        "resource-id"
    }

    fn apply(&self, code: &str, _class: SecretClass) -> String {
        if !code.contains(&self.placeholder) {
            return code.to_string();
        }

        self.quoted
            .iter()
            .fold(code.to_string(), |code, literal| code.replace(literal, &self.binding))
    }
}
