pub mod error;
pub mod load;
pub mod rule_compiler;
pub mod rule_document;
