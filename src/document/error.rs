use thiserror::Error;

/// An error in a rule document, located by rule index where it concerns a rule.
#[derive(Debug)]
pub struct RuleDocumentError {
    pub kind: RuleDocumentErrorKind,
    pub rule: Option<usize>,
}

#[derive(Error, PartialEq, Eq, Debug)]
pub enum RuleDocumentErrorKind {
    #[error("{0} is defined multiple times")]
    NameDefinedMultipleTimes(String),

    #[error("unresolved attributes definition: {0}")]
    UnresolvedAttributes(String),

    #[error("unresolved ACL definition: {0}")]
    UnresolvedAcl(String),

    #[error("unresolved objects definition: {0}")]
    UnresolvedObjects(String),

    #[error("unresolved formula definition: {0}")]
    UnresolvedFormula(String),

    #[error("rule has no ACL")]
    AclMissing,

    #[error("rule has no formula")]
    FormulaMissing,

    #[error("rule has both an inline {0} and a reference")]
    Ambiguous(&'static str),
}

impl std::fmt::Display for RuleDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.rule {
            Some(index) => write!(f, "rule {index}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}
