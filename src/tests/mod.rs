use twinly_expr::AccessPermissionRule;

use crate::{
    EnvConfig, Twinly,
    document::{
        error::RuleDocumentError, rule_compiler::compile_rule_document,
        rule_document::RuleDocument,
    },
};


#[track_caller]
fn compile_rules(source: &str) -> Result<Vec<AccessPermissionRule>, Vec<RuleDocumentError>> {
    compile_rule_document(RuleDocument::from_json(source).unwrap())
}

#[track_caller]
fn twinly_with_rules(source: &str) -> Twinly {
    Twinly::with_rules(&EnvConfig::default(), compile_rules(source).unwrap())
}
