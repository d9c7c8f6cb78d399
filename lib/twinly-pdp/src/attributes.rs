//! Resolution of subject claims and global attributes declared by a rule.

use fnv::FnvHashMap;
use serde_json::{Map, Value as JsonValue};
use time::Time;
use tracing::{debug, warn};
use twinly_expr::{AttributeItem, GlobalAttribute, LogicalExpression, StringValue, Value};

use crate::clock::Clock;

/// Subject claims as found in the bearer credential.
pub type Claims = Map<String, JsonValue>;

/// A claim leaf usable in a formula.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ClaimValue {
    String(String),
    List(Vec<String>),
}

/// Attribute values resolved for one rule evaluation.
#[derive(Default, Debug)]
pub struct ResolvedAttributes {
    claims: FnvHashMap<String, ClaimValue>,
    globals: FnvHashMap<GlobalAttribute, Time>,
}

impl ResolvedAttributes {
    /// Resolve the given attribute items against the subject claims and the clock.
    ///
    /// Items that cannot be resolved are left out, which makes every comparison against them false.
    pub fn resolve<'a>(
        items: impl IntoIterator<Item = &'a AttributeItem>,
        claims: &Claims,
        clock: &dyn Clock,
    ) -> Self {
        let mut resolved = Self::default();

        for item in items {
            match item {
                AttributeItem::Claim(path) => {
                    if resolved.claims.contains_key(path) {
                        continue;
                    }
                    match resolve_claim(claims, path) {
                        Some(value) => {
                            resolved.claims.insert(path.clone(), value);
                        }
                        None => {
                            debug!(?path, "claim not resolved");
                        }
                    }
                }
                AttributeItem::Global(global) => {
                    let now = match global {
                        GlobalAttribute::UtcNow => clock.now_utc(),
                        GlobalAttribute::LocalNow => clock.now_local(),
                        GlobalAttribute::ClientNow | GlobalAttribute::Anonymous => {
                            warn!(?global, "unsupported global attribute");
                            continue;
                        }
                    };
                    if let Ok(time) = Time::from_hms(now.hour(), now.minute(), 0) {
                        resolved.globals.insert(*global, time);
                    }
                }
                AttributeItem::Reference(reference) => {
                    warn!(?reference, "reference attributes are not supported");
                }
            }
        }

        resolved
    }

    pub fn with_claim(mut self, path: impl Into<String>, value: ClaimValue) -> Self {
        self.claims.insert(path.into(), value);
        self
    }

    pub fn with_global(mut self, global: GlobalAttribute, time: Time) -> Self {
        self.globals.insert(global, time);
        self
    }

    pub fn claim(&self, path: &str) -> Option<&ClaimValue> {
        self.claims.get(path)
    }

    /// The time of day of a global, truncated to the minute.
    pub fn global(&self, global: GlobalAttribute) -> Option<Time> {
        self.globals.get(&global).copied()
    }
}

/// Walk a dot-separated path through nested claim objects.
pub fn resolve_claim(claims: &Claims, path: &str) -> Option<ClaimValue> {
    let mut segments = path.split('.').peekable();
    let mut current = claims;

    while let Some(segment) = segments.next() {
        let value = current.get(segment)?;

        if segments.peek().is_some() {
            current = value.as_object()?;
            continue;
        }

        return match value {
            JsonValue::String(string) => Some(ClaimValue::String(string.clone())),
            JsonValue::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(ClaimValue::List),
            _ => None,
        };
    }

    None
}

/// Attribute items referenced directly in a formula.
pub fn referenced_attributes(expr: &LogicalExpression) -> Vec<&AttributeItem> {
    fn visit_value<'a>(value: &'a Value, out: &mut Vec<&'a AttributeItem>) {
        match value {
            Value::Attribute(item) => out.push(item),
            Value::DayOfWeek(operand)
            | Value::DayOfMonth(operand)
            | Value::Month(operand)
            | Value::Year(operand)
            | Value::StrCast(operand)
            | Value::NumCast(operand)
            | Value::BoolCast(operand)
            | Value::HexCast(operand)
            | Value::DateTimeCast(operand)
            | Value::TimeCast(operand) => visit_value(operand, out),
            _ => {}
        }
    }

    fn visit<'a>(expr: &'a LogicalExpression, out: &mut Vec<&'a AttributeItem>) {
        match expr {
            LogicalExpression::And(children)
            | LogicalExpression::Or(children)
            | LogicalExpression::Match(children) => {
                for child in children {
                    visit(child, out);
                }
            }
            LogicalExpression::Not(child) => visit(child, out),
            LogicalExpression::Boolean(_) => {}
            other => {
                if let Some((_, operands)) = other.as_comparison() {
                    for operand in operands {
                        visit_value(operand, out);
                    }
                } else if let Some((_, operands)) = other.as_string_operation() {
                    for operand in operands {
                        match operand {
                            StringValue::Attribute(item) => out.push(item),
                            StringValue::StrCast(value) => visit_value(value, out),
                            StringValue::Field(_) | StringValue::Str(_) => {}
                        }
                    }
                }
            }
        }
    }

    let mut out = vec![];
    visit(expr, &mut out);
    out
}
