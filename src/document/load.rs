use std::{fs, path::Path};

use anyhow::anyhow;
use tracing::info;
use twinly_expr::AccessPermissionRule;

use crate::document::{rule_compiler::compile_rule_document, rule_document::RuleDocument};

/// Load and resolve the rule document at `path`.
pub fn load_rule_document(path: &Path) -> anyhow::Result<Vec<AccessPermissionRule>> {
    let source = fs::read_to_string(path)
        .map_err(|err| anyhow!("rule document {path:?} failed to load: {err}"))?;

    let rules = parse_rule_document(&source)?;
    info!(?path, count = rules.len(), "rules loaded");

    Ok(rules)
}

pub fn parse_rule_document(source: &str) -> anyhow::Result<Vec<AccessPermissionRule>> {
    let document = RuleDocument::from_json(source)?;

    match compile_rule_document(document) {
        Ok(rules) => Ok(rules),
        Err(errors) => {
            for error in &errors {
                tracing::error!("rule document error: {error}");
            }
            Err(anyhow!("rule document has {} error(s)", errors.len()))
        }
    }
}
