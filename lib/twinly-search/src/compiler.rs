//! Lowering of query expressions into backend queries.
//!
//! Compilation never fails. Any part that cannot be lowered (unknown field,
//! missing literal, wrong arity) becomes a match-all clause.

use tracing::debug;
use twinly_expr::{
    ComparisonOp, FieldResolver, KeywordFieldResolver, LogicalExpression, Query, Scalar, StringOp,
    StringValue, Value,
    expr::binary,
    field::KEYWORD_SUFFIX,
    value::{extract_field_name, extract_string_field_name, extract_string_value, extract_value},
};

use crate::query::{RangeBound, SearchQuery};

#[derive(Clone, Default, Debug)]
pub struct QueryCompiler<R = KeywordFieldResolver> {
    resolver: R,
}

impl<R: FieldResolver> QueryCompiler<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn compile(&self, query: &Query) -> SearchQuery {
        match &query.condition {
            Some(condition) => self.compile_expr(condition),
            None => SearchQuery::MatchAll,
        }
    }

    pub fn compile_expr(&self, expr: &LogicalExpression) -> SearchQuery {
        match expr {
            LogicalExpression::And(children) | LogicalExpression::Match(children)
                if !children.is_empty() =>
            {
                SearchQuery::must(children.iter().map(|child| self.compile_expr(child)).collect())
            }
            LogicalExpression::Or(children) if !children.is_empty() => {
                SearchQuery::should(children.iter().map(|child| self.compile_expr(child)).collect())
            }
            LogicalExpression::Not(child) => SearchQuery::must_not(self.compile_expr(child)),
            LogicalExpression::Boolean(true) => SearchQuery::MatchAll,
            LogicalExpression::Boolean(false) => SearchQuery::MatchNone,
            _ => {
                if let Some((op, operands)) = expr.as_comparison() {
                    self.compile_comparison(op, operands)
                } else if let Some((op, operands)) = expr.as_string_operation() {
                    self.compile_string_operation(op, operands)
                } else {
                    fallback("empty connective")
                }
            }
        }
    }

    fn compile_comparison(&self, op: ComparisonOp, operands: &[Value]) -> SearchQuery {
        let Some((lhs, rhs)) = binary(operands) else {
            return fallback("comparison arity");
        };

        match (
            extract_field_name(lhs, &self.resolver),
            extract_field_name(rhs, &self.resolver),
        ) {
            (Some(lhs_field), Some(rhs_field)) => field_to_field(
                op,
                FieldOperand::new(lhs_field, Cast::of(lhs)),
                FieldOperand::new(rhs_field, Cast::of(rhs)),
            ),
            (Some(field), None) => field_to_value(op, field, extract_value(rhs)),
            (None, Some(field)) => field_to_value(op.mirrored(), field, extract_value(lhs)),
            (None, None) => fallback("no field operand"),
        }
    }

    /// A literal on the left is treated as if the operands were swapped,
    /// `[literal, field]` reads as `field op literal`.
    fn compile_string_operation(&self, op: StringOp, operands: &[StringValue]) -> SearchQuery {
        let Some((lhs, rhs)) = binary(operands) else {
            return fallback("string operation arity");
        };

        let (field, value) = match (
            extract_string_field_name(lhs, &self.resolver),
            extract_string_field_name(rhs, &self.resolver),
        ) {
            (Some(lhs_field), Some(rhs_field)) => {
                return string_field_to_field(op, &lhs_field, &rhs_field);
            }
            (Some(field), None) => (field, extract_string_value(rhs)),
            (None, Some(field)) => (field, extract_string_value(lhs)),
            (None, None) => return fallback("no field operand"),
        };
        let Some(value) = value else {
            return fallback("no string literal");
        };

        match op {
            StringOp::Contains => SearchQuery::Wildcard {
                field,
                pattern: format!("*{}*", escape_wildcard(&value)),
            },
            StringOp::StartsWith => SearchQuery::Wildcard {
                field,
                pattern: format!("{}*", escape_wildcard(&value)),
            },
            StringOp::EndsWith => SearchQuery::Wildcard {
                field,
                pattern: format!("*{}", escape_wildcard(&value)),
            },
            StringOp::Regex => SearchQuery::Regexp {
                field,
                pattern: strip_anchors(&value).to_string(),
            },
        }
    }
}

fn field_to_value(op: ComparisonOp, field: String, value: Option<Scalar>) -> SearchQuery {
    let Some(value) = value else {
        return fallback("no literal operand");
    };

    let range = |bound| SearchQuery::Range {
        field: field.clone(),
        bound,
        value: value.clone(),
    };

    match op {
        ComparisonOp::Eq => SearchQuery::Term {
            field: field.clone(),
            value: value.clone(),
        },
        ComparisonOp::Ne => SearchQuery::must_not(SearchQuery::Term {
            field: field.clone(),
            value: value.clone(),
        }),
        ComparisonOp::Gt => range(RangeBound::Gt),
        ComparisonOp::Ge => range(RangeBound::Gte),
        ComparisonOp::Lt => range(RangeBound::Lt),
        ComparisonOp::Le => range(RangeBound::Lte),
    }
}

/// Cast applied to a field operand, mirrored in the comparison script.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Cast {
    Str,
    Num,
    Bool,
    Hex,
    DateTime,
    Time,
}

impl Cast {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::StrCast(_) => Some(Self::Str),
            Value::NumCast(_) => Some(Self::Num),
            Value::BoolCast(_) => Some(Self::Bool),
            Value::HexCast(_) => Some(Self::Hex),
            Value::DateTimeCast(_) => Some(Self::DateTime),
            Value::TimeCast(_) => Some(Self::Time),
            _ => None,
        }
    }
}

struct FieldOperand {
    field: String,
    cast: Option<Cast>,
}

impl FieldOperand {
    fn new(field: String, cast: Option<Cast>) -> Self {
        Self {
            field: keyword_field(field),
            cast,
        }
    }

    fn script(&self) -> String {
        let doc = doc_value(&self.field);
        match self.cast {
            None => doc,
            Some(Cast::Str | Cast::DateTime | Cast::Time) => format!("{doc}.toString()"),
            Some(Cast::Num) => format!("Double.parseDouble({doc}.toString())"),
            Some(Cast::Bool) => format!("Boolean.parseBoolean({doc}.toString())"),
            Some(Cast::Hex) => format!("Integer.parseInt({doc}.toString().substring(3), 16)"),
        }
    }
}

fn field_to_field(op: ComparisonOp, lhs: FieldOperand, rhs: FieldOperand) -> SearchQuery {
    let operator = match op {
        ComparisonOp::Eq => "==",
        ComparisonOp::Ne => "!=",
        ComparisonOp::Gt => ">",
        ComparisonOp::Ge => ">=",
        ComparisonOp::Lt => "<",
        ComparisonOp::Le => "<=",
    };

    guarded_script(
        &lhs.field,
        &rhs.field,
        format!("{} {operator} {}", lhs.script(), rhs.script()),
    )
}

fn string_field_to_field(op: StringOp, lhs: &str, rhs: &str) -> SearchQuery {
    let lhs = keyword_field(lhs.to_string());
    let rhs = keyword_field(rhs.to_string());
    let (lhs_doc, rhs_doc) = (doc_value(&lhs), doc_value(&rhs));

    let source = match op {
        StringOp::Contains => format!("{lhs_doc}.contains({rhs_doc})"),
        StringOp::StartsWith => format!("{lhs_doc}.startsWith({rhs_doc})"),
        StringOp::EndsWith => format!("{lhs_doc}.endsWith({rhs_doc})"),
        // painless only matches against pattern literals
        StringOp::Regex => return fallback("regex between fields"),
    };

    guarded_script(&lhs, &rhs, source)
}

/// Both fields must exist for the script to be evaluable.
///
/// Field names are quoted into the script source, so a name containing a quote
/// or a backslash is never emitted.
fn guarded_script(lhs: &str, rhs: &str, source: String) -> SearchQuery {
    if !quotable(lhs) || !quotable(rhs) {
        return fallback("field name not quotable in script");
    }

    SearchQuery::must(vec![
        SearchQuery::Exists {
            field: lhs.to_string(),
        },
        SearchQuery::Exists {
            field: rhs.to_string(),
        },
        SearchQuery::Script { source },
    ])
}

fn quotable(field: &str) -> bool {
    !field.contains(['\'', '\\'])
}

fn doc_value(field: &str) -> String {
    format!("doc['{field}'].value")
}

fn keyword_field(field: String) -> String {
    if field.ends_with(KEYWORD_SUFFIX) {
        field
    } else {
        format!("{field}{KEYWORD_SUFFIX}")
    }
}

/// Escape the wildcard metacharacters `\`, `*` and `?`.
pub fn escape_wildcard(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '*' | '?') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Regexp queries are implicitly anchored.
fn strip_anchors(pattern: &str) -> &str {
    pattern
        .strip_prefix('^')
        .and_then(|rest| rest.strip_suffix('$'))
        .unwrap_or(pattern)
}

fn fallback(reason: &'static str) -> SearchQuery {
    debug!(reason, "falling back to match_all");
    SearchQuery::MatchAll
}
