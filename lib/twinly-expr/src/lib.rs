//! The expression language shared by access-rule formulas and search queries.
//!
//! One AST, two evaluators: the policy decision point interprets a
//! [LogicalExpression] against attribute maps, the search crate compiles it into
//! a backend query.

pub mod expr;
pub mod field;
pub mod rule;
pub mod value;

pub use expr::{
    AttributeItem, ComparisonOp, GlobalAttribute, LogicalExpression, Query, StringOp,
    StringValue, Value,
};
pub use field::{FieldResolver, KeywordFieldResolver};
pub use rule::{Access, AccessPermissionRule, Acl, ObjectItem, Right};
pub use value::Scalar;

#[cfg(test)]
mod test_wire;
