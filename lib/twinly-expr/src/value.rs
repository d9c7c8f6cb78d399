//! Literal extraction and type coercion of [Value] operands.

use std::fmt::Display;

use serde::Serialize;
use time::{
    OffsetDateTime, Time, format_description::well_known::Rfc3339, macros::format_description,
};
use tracing::debug;

use crate::{
    expr::{StringOp, StringValue, Value, binary},
    field::FieldResolver,
};

/// A literal extracted from a [Value], ready to be compared or emitted into a query.
#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(string) => f.write_str(string),
            Self::Number(number) => write!(f, "{number}"),
            Self::Integer(integer) => write!(f, "{integer}"),
            Self::Bool(boolean) => write!(f, "{boolean}"),
        }
    }
}

/// Extract the literal of a value operand.
///
/// Field and attribute references have no literal and yield `None`.
pub fn extract_value(value: &Value) -> Option<Scalar> {
    match value {
        Value::Str(string) => Some(Scalar::String(string.clone())),
        Value::Num(number) => Some(Scalar::Number(*number)),
        Value::Bool(boolean) => Some(Scalar::Bool(*boolean)),
        Value::Hex(hex) => Some(Scalar::String(
            hex.strip_prefix("16#").unwrap_or(hex).to_string(),
        )),
        Value::DateTime(datetime) => format_datetime(*datetime).map(Scalar::String),
        Value::Time(time) => Some(Scalar::String(time.clone())),
        Value::DayOfWeek(operand) => extract_datetime(operand)
            .map(|datetime| Scalar::Integer(datetime.weekday().number_from_sunday().into())),
        Value::DayOfMonth(operand) => {
            extract_datetime(operand).map(|datetime| Scalar::Integer(datetime.day().into()))
        }
        Value::Month(operand) => extract_datetime(operand)
            .map(|datetime| Scalar::Integer(u8::from(datetime.month()).into())),
        Value::Year(operand) => {
            extract_datetime(operand).map(|datetime| Scalar::Integer(datetime.year().into()))
        }
        Value::StrCast(operand) => {
            extract_value(operand).map(|scalar| Scalar::String(scalar.to_string()))
        }
        Value::NumCast(operand) => match extract_value(operand)? {
            Scalar::Number(number) => Some(Scalar::Number(number)),
            Scalar::Integer(integer) => Some(Scalar::Number(integer as f64)),
            Scalar::String(string) => match string.trim().parse::<f64>() {
                Ok(number) if number.is_finite() => Some(Scalar::Number(number)),
                _ => {
                    debug!(?string, "not a number");
                    None
                }
            },
            Scalar::Bool(_) => None,
        },
        Value::BoolCast(operand) => match extract_value(operand)? {
            Scalar::Bool(boolean) => Some(Scalar::Bool(boolean)),
            Scalar::String(string) if string.eq_ignore_ascii_case("true") => {
                Some(Scalar::Bool(true))
            }
            Scalar::String(string) if string.eq_ignore_ascii_case("false") => {
                Some(Scalar::Bool(false))
            }
            _ => None,
        },
        Value::HexCast(operand) => match extract_value(operand)? {
            Scalar::Number(number) if number.is_finite() => {
                Some(Scalar::String(format!("16#{:X}", number.trunc() as i64)))
            }
            Scalar::Integer(integer) => Some(Scalar::String(format!("16#{integer:X}"))),
            Scalar::String(string) => Some(Scalar::String(string)),
            _ => None,
        },
        Value::DateTimeCast(operand) => match extract_datetime(operand) {
            Some(datetime) => format_datetime(datetime).map(Scalar::String),
            None => extract_value(operand).map(|scalar| Scalar::String(scalar.to_string())),
        },
        Value::TimeCast(operand) => {
            extract_value(operand).map(|scalar| Scalar::String(scalar.to_string()))
        }
        Value::Field(_) | Value::Attribute(_) => None,
    }
}

/// Extract the physical field name of a field operand, looking through casts.
pub fn extract_field_name(value: &Value, resolver: &dyn FieldResolver) -> Option<String> {
    match value {
        Value::Field(path) => resolver.resolve(path),
        Value::StrCast(operand)
        | Value::NumCast(operand)
        | Value::BoolCast(operand)
        | Value::HexCast(operand)
        | Value::DateTimeCast(operand)
        | Value::TimeCast(operand) => extract_field_name(operand, resolver),
        _ => None,
    }
}

pub fn extract_string_field_name(
    value: &StringValue,
    resolver: &dyn FieldResolver,
) -> Option<String> {
    match value {
        StringValue::Field(path) => resolver.resolve(path),
        StringValue::StrCast(operand) => extract_field_name(operand, resolver),
        _ => None,
    }
}

pub fn extract_string_value(value: &StringValue) -> Option<String> {
    match value {
        StringValue::Str(string) => Some(string.clone()),
        StringValue::StrCast(operand) => extract_value(operand).map(|scalar| scalar.to_string()),
        _ => None,
    }
}

/// The datetime behind an extraction function operand.
pub fn extract_datetime(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::DateTime(datetime) => Some(*datetime),
        Value::Str(string) => OffsetDateTime::parse(string, &Rfc3339).ok(),
        Value::DateTimeCast(operand) => extract_datetime(operand),
        _ => None,
    }
}

/// `yyyy-MM-ddTHH:mm:ss.SSS` followed by `Z` or a `+HH:MM` offset.
pub fn format_datetime(datetime: OffsetDateTime) -> Option<String> {
    let formatted = if datetime.offset().is_utc() {
        datetime.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
    } else {
        datetime.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory]:[offset_minute]"
        ))
    };

    match formatted {
        Ok(formatted) => Some(formatted),
        Err(err) => {
            debug!(?err, "unformattable datetime");
            None
        }
    }
}

/// Parse a time of day written as `HH:mm` or `HH:mm:ss`.
pub fn parse_time_of_day(input: &str) -> Option<Time> {
    let input = input.trim();
    Time::parse(input, format_description!("[hour]:[minute]"))
        .or_else(|_| Time::parse(input, format_description!("[hour]:[minute]:[second]")))
        .ok()
}

/// Format a time of day as `HH:mm`.
pub fn format_time_of_day(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Evaluate a string operation over two string literals.
///
/// Operands that are not literals (fields, attributes) never match.
pub fn string_predicate(op: StringOp, operands: &[StringValue]) -> bool {
    let Some((lhs, rhs)) = binary(operands) else {
        return false;
    };
    let (Some(lhs), Some(rhs)) = (extract_string_value(lhs), extract_string_value(rhs)) else {
        return false;
    };

    match op {
        StringOp::Contains => lhs.contains(&rhs),
        StringOp::StartsWith => lhs.starts_with(&rhs),
        StringOp::EndsWith => lhs.ends_with(&rhs),
        StringOp::Regex => false,
    }
}
