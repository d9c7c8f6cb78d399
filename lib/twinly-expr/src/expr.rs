//! Expression tree, as it appears on the wire.
//!
//! Every node is a single-key JSON object, e.g.
//! `{"$eq": [{"$field": "$aas#idShort"}, {"$strVal": "Motor1"}]}`.
//! The key names are a deployed format and must not change.

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// Operand of a comparison.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub enum Value {
    /// Reference to a model field, e.g. `$aas#idShort`
    #[serde(rename = "$field")]
    Field(String),
    #[serde(rename = "$strVal")]
    Str(String),
    #[serde(rename = "$numVal")]
    Num(f64),
    #[serde(rename = "$boolean")]
    Bool(bool),
    /// Hex literal in the canonical form `16#<HEX>`
    #[serde(rename = "$hexVal")]
    Hex(String),
    #[serde(rename = "$dateTimeVal", with = "time::serde::rfc3339")]
    DateTime(OffsetDateTime),
    /// Time of day, `HH:mm`
    #[serde(rename = "$timeVal")]
    Time(String),
    #[serde(rename = "$attribute")]
    Attribute(AttributeItem),
    #[serde(rename = "$dayOfWeek", deserialize_with = "date_operand")]
    DayOfWeek(Box<Value>),
    #[serde(rename = "$dayOfMonth", deserialize_with = "date_operand")]
    DayOfMonth(Box<Value>),
    #[serde(rename = "$month", deserialize_with = "date_operand")]
    Month(Box<Value>),
    #[serde(rename = "$year", deserialize_with = "date_operand")]
    Year(Box<Value>),
    #[serde(rename = "$strCast")]
    StrCast(Box<Value>),
    #[serde(rename = "$numCast")]
    NumCast(Box<Value>),
    #[serde(rename = "$boolCast")]
    BoolCast(Box<Value>),
    #[serde(rename = "$hexCast")]
    HexCast(Box<Value>),
    #[serde(rename = "$dateTimeCast")]
    DateTimeCast(Box<Value>),
    #[serde(rename = "$timeCast")]
    TimeCast(Box<Value>),
}

impl Value {
    pub fn field(path: impl Into<String>) -> Self {
        Self::Field(path.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn time(value: impl Into<String>) -> Self {
        Self::Time(value.into())
    }

    pub fn claim(path: impl Into<String>) -> Self {
        Self::Attribute(AttributeItem::Claim(path.into()))
    }

    pub fn global(global: GlobalAttribute) -> Self {
        Self::Attribute(AttributeItem::Global(global))
    }
}

/// Extraction functions take either a nested value or a bare ISO-8601 datetime string.
fn date_operand<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Box<Value>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DateOperand {
        Literal(#[serde(with = "time::serde::rfc3339")] OffsetDateTime),
        Value(Box<Value>),
    }

    Ok(match DateOperand::deserialize(deserializer)? {
        DateOperand::Literal(datetime) => Box::new(Value::DateTime(datetime)),
        DateOperand::Value(value) => value,
    })
}

/// A subject or environment attribute referenced from a rule.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum AttributeItem {
    /// Dot-separated path into the subject's credential claims
    #[serde(rename = "CLAIM")]
    Claim(String),
    #[serde(rename = "GLOBAL")]
    Global(GlobalAttribute),
    #[serde(rename = "REFERENCE")]
    Reference(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
#[serde(rename_all = "UPPERCASE")]
pub enum GlobalAttribute {
    LocalNow,
    UtcNow,
    ClientNow,
    Anonymous,
}

/// Operand of a string operation.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub enum StringValue {
    #[serde(rename = "$field")]
    Field(String),
    #[serde(rename = "$strVal")]
    Str(String),
    #[serde(rename = "$strCast")]
    StrCast(Box<Value>),
    #[serde(rename = "$attribute")]
    Attribute(AttributeItem),
}

/// Logical expression.
///
/// Comparison operands are kept as a list so that a payload with the wrong arity
/// still deserializes. Evaluators treat anything but exactly two operands as a non-match.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub enum LogicalExpression {
    #[serde(rename = "$and")]
    And(Vec<LogicalExpression>),
    #[serde(rename = "$or")]
    Or(Vec<LogicalExpression>),
    #[serde(rename = "$not")]
    Not(Box<LogicalExpression>),
    #[serde(rename = "$eq")]
    Eq(Vec<Value>),
    #[serde(rename = "$ne")]
    Ne(Vec<Value>),
    #[serde(rename = "$le")]
    Le(Vec<Value>),
    #[serde(rename = "$lt")]
    Lt(Vec<Value>),
    #[serde(rename = "$ge")]
    Ge(Vec<Value>),
    #[serde(rename = "$gt")]
    Gt(Vec<Value>),
    #[serde(rename = "$contains")]
    Contains(Vec<StringValue>),
    #[serde(rename = "$starts-with")]
    StartsWith(Vec<StringValue>),
    #[serde(rename = "$ends-with")]
    EndsWith(Vec<StringValue>),
    #[serde(rename = "$regex")]
    Regex(Vec<StringValue>),
    #[serde(rename = "$boolean")]
    Boolean(bool),
    /// Conjunction of match expressions
    #[serde(rename = "$match")]
    Match(Vec<LogicalExpression>),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
}

impl ComparisonOp {
    /// The operator with its operands swapped: `a < b` is `b > a`.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Eq => Self::Eq,
            Self::Ne => Self::Ne,
            Self::Le => Self::Ge,
            Self::Lt => Self::Gt,
            Self::Ge => Self::Le,
            Self::Gt => Self::Lt,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StringOp {
    Contains,
    StartsWith,
    EndsWith,
    Regex,
}

impl LogicalExpression {
    pub fn and(exprs: impl IntoIterator<Item = LogicalExpression>) -> Self {
        Self::And(exprs.into_iter().collect())
    }

    pub fn or(exprs: impl IntoIterator<Item = LogicalExpression>) -> Self {
        Self::Or(exprs.into_iter().collect())
    }

    pub fn not(expr: LogicalExpression) -> Self {
        Self::Not(Box::new(expr))
    }

    pub fn eq(lhs: Value, rhs: Value) -> Self {
        Self::Eq(vec![lhs, rhs])
    }

    pub fn ne(lhs: Value, rhs: Value) -> Self {
        Self::Ne(vec![lhs, rhs])
    }

    /// The comparison operator and its operands, if this is a comparison node.
    pub fn as_comparison(&self) -> Option<(ComparisonOp, &[Value])> {
        match self {
            Self::Eq(operands) => Some((ComparisonOp::Eq, operands)),
            Self::Ne(operands) => Some((ComparisonOp::Ne, operands)),
            Self::Le(operands) => Some((ComparisonOp::Le, operands)),
            Self::Lt(operands) => Some((ComparisonOp::Lt, operands)),
            Self::Ge(operands) => Some((ComparisonOp::Ge, operands)),
            Self::Gt(operands) => Some((ComparisonOp::Gt, operands)),
            _ => None,
        }
    }

    /// The string operator and its operands, if this is a string operation node.
    pub fn as_string_operation(&self) -> Option<(StringOp, &[StringValue])> {
        match self {
            Self::Contains(operands) => Some((StringOp::Contains, operands)),
            Self::StartsWith(operands) => Some((StringOp::StartsWith, operands)),
            Self::EndsWith(operands) => Some((StringOp::EndsWith, operands)),
            Self::Regex(operands) => Some((StringOp::Regex, operands)),
            _ => None,
        }
    }
}

/// The two operands of a binary operation, or `None` for any other arity.
pub fn binary<T>(operands: &[T]) -> Option<(&T, &T)> {
    match operands {
        [lhs, rhs] => Some((lhs, rhs)),
        _ => None,
    }
}

/// A search query.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize, Debug)]
pub struct Query {
    /// Field projection, currently only `"id"` has a meaning
    #[serde(rename = "$select", default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,

    /// Filter condition. A missing condition matches everything.
    #[serde(rename = "$condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<LogicalExpression>,
}
