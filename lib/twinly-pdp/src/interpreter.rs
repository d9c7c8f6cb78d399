//! Formula interpreter.
//!
//! Evaluation fails closed: anything that cannot be resolved or compared is `false`.

use std::cmp::Ordering;

use fnv::FnvHashMap;
use tracing::trace;
use twinly_expr::{
    AttributeItem, ComparisonOp, FieldResolver, GlobalAttribute, LogicalExpression, Value,
    expr::binary, value::parse_time_of_day,
};

use crate::attributes::{ClaimValue, ResolvedAttributes};

/// Attributes of the object being accessed, keyed by model field path (e.g. `$aas#idShort`).
pub type ObjectAttributes = FnvHashMap<String, Value>;

pub struct Interpreter<'a> {
    pub object_attributes: &'a ObjectAttributes,
    pub attributes: &'a ResolvedAttributes,
    pub field_resolver: &'a dyn FieldResolver,
}

impl Interpreter<'_> {
    pub fn eval(&self, expr: &LogicalExpression) -> bool {
        match expr {
            LogicalExpression::And(children) | LogicalExpression::Match(children) => {
                !children.is_empty() && children.iter().all(|child| self.eval(child))
            }
            LogicalExpression::Or(children) => children.iter().any(|child| self.eval(child)),
            LogicalExpression::Not(child) => !self.eval(child),
            LogicalExpression::Boolean(value) => *value,
            LogicalExpression::Contains(_)
            | LogicalExpression::StartsWith(_)
            | LogicalExpression::EndsWith(_)
            | LogicalExpression::Regex(_) => {
                trace!("string operation in formula");
                false
            }
            LogicalExpression::Eq(_)
            | LogicalExpression::Ne(_)
            | LogicalExpression::Le(_)
            | LogicalExpression::Lt(_)
            | LogicalExpression::Ge(_)
            | LogicalExpression::Gt(_) => {
                let Some((op, operands)) = expr.as_comparison() else {
                    return false;
                };
                let Some((lhs, rhs)) = binary(operands) else {
                    trace!(?op, arity = operands.len(), "malformed comparison");
                    return false;
                };
                self.eval_comparison(op, lhs, rhs)
            }
        }
    }

    fn eval_comparison(&self, op: ComparisonOp, lhs: &Value, rhs: &Value) -> bool {
        match op {
            ComparisonOp::Eq => self.equals(lhs, rhs),
            ComparisonOp::Ne => !self.equals(lhs, rhs),
            ComparisonOp::Le => self.compare(lhs, rhs).is_some_and(Ordering::is_le),
            ComparisonOp::Lt => self.compare(lhs, rhs).is_some_and(Ordering::is_lt),
            ComparisonOp::Ge => self.compare(lhs, rhs).is_some_and(Ordering::is_ge),
            ComparisonOp::Gt => self.compare(lhs, rhs).is_some_and(Ordering::is_gt),
        }
    }

    fn equals(&self, lhs: &Value, rhs: &Value) -> bool {
        match (lhs, rhs) {
            (Value::Attribute(AttributeItem::Claim(path)), Value::Str(expected)) => {
                match self.attributes.claim(path) {
                    Some(ClaimValue::String(actual)) => actual == expected,
                    Some(ClaimValue::List(items)) => items.contains(expected),
                    None => false,
                }
            }
            _ => self.compare(lhs, rhs) == Some(Ordering::Equal),
        }
    }

    /// Compares the resolved left operand to the right operand.
    ///
    /// A claim list never orders before or after a literal, it always compares equal.
    fn compare(&self, lhs: &Value, rhs: &Value) -> Option<Ordering> {
        match lhs {
            Value::Field(path) if self.field_resolver.is_model_path(path) => {
                self.compare_field(path, rhs)
            }
            Value::Attribute(AttributeItem::Claim(path)) => {
                let Value::Str(expected) = rhs else {
                    return None;
                };
                match self.attributes.claim(path)? {
                    ClaimValue::String(actual) => Some(actual.as_str().cmp(expected)),
                    ClaimValue::List(_) => Some(Ordering::Equal),
                }
            }
            Value::Attribute(AttributeItem::Global(global)) => self.compare_global(*global, rhs),
            _ => None,
        }
    }

    fn compare_field(&self, path: &str, rhs: &Value) -> Option<Ordering> {
        let actual = self.object_attributes.get(path)?;

        match (actual, rhs) {
            (Value::Str(actual), Value::Str(expected)) => Some(actual.cmp(expected)),
            (Value::Time(actual), Value::Time(expected)) => {
                Some(parse_time_of_day(actual)?.cmp(&parse_time_of_day(expected)?))
            }
            _ => None,
        }
    }

    fn compare_global(&self, global: GlobalAttribute, rhs: &Value) -> Option<Ordering> {
        let now = self.attributes.global(global)?;
        let other = match rhs {
            Value::Time(time) => parse_time_of_day(time)?,
            Value::Attribute(AttributeItem::Global(other)) => self.attributes.global(*other)?,
            _ => return None,
        };

        Some(now.cmp(&other))
    }
}
