use indoc::indoc;
use time::macros::datetime;

use crate::{
    Access, AccessPermissionRule, AttributeItem, GlobalAttribute, LogicalExpression, ObjectItem,
    Query, Right, StringValue, Value,
};

#[track_caller]
fn expr(json: &str) -> LogicalExpression {
    serde_json::from_str(json).unwrap()
}

#[test]
fn comparison() {
    let parsed = expr(indoc! {r#"
        { "$eq": [{ "$field": "$aas#idShort" }, { "$strVal": "Motor1" }] }
    "#});

    assert_eq!(
        parsed,
        LogicalExpression::eq(Value::field("$aas#idShort"), Value::str("Motor1"))
    );
}

#[test]
fn nested_connectives() {
    let parsed = expr(indoc! {r#"
        {
            "$and": [
                { "$not": { "$eq": [{ "$attribute": { "CLAIM": "department" } }, { "$strVal": "sales" }] } },
                { "$or": [
                    { "$ge": [{ "$attribute": { "GLOBAL": "UTCNOW" } }, { "$timeVal": "08:00" }] },
                    { "$boolean": false }
                ] }
            ]
        }
    "#});

    assert_eq!(
        parsed,
        LogicalExpression::and([
            LogicalExpression::not(LogicalExpression::eq(
                Value::claim("department"),
                Value::str("sales")
            )),
            LogicalExpression::or([
                LogicalExpression::Ge(vec![
                    Value::global(GlobalAttribute::UtcNow),
                    Value::time("08:00")
                ]),
                LogicalExpression::Boolean(false),
            ]),
        ])
    );
}

#[test]
fn wrong_arity_still_parses() {
    let parsed = expr(r#"{ "$eq": [{ "$strVal": "lonely" }] }"#);
    assert_eq!(parsed.as_comparison().map(|(_, operands)| operands.len()), Some(1));
}

#[test]
fn extraction_operand_accepts_bare_datetime() {
    let bare = expr(indoc! {r#"
        { "$eq": [{ "$dayOfWeek": "2024-06-02T12:00:00Z" }, { "$numVal": 1 }] }
    "#});
    let nested = expr(indoc! {r#"
        { "$eq": [{ "$dayOfWeek": { "$dateTimeVal": "2024-06-02T12:00:00Z" } }, { "$numVal": 1 }] }
    "#});

    assert_eq!(bare, nested);
    assert_eq!(
        bare,
        LogicalExpression::eq(
            Value::DayOfWeek(Box::new(Value::DateTime(datetime!(2024-06-02 12:00 UTC)))),
            Value::Num(1.0)
        )
    );
}

#[test]
fn string_operations() {
    let parsed = expr(indoc! {r#"
        { "$starts-with": [{ "$field": "$aas#idShort" }, { "$strCast": { "$numVal": 7 } }] }
    "#});

    assert_eq!(
        parsed,
        LogicalExpression::StartsWith(vec![
            StringValue::Field("$aas#idShort".into()),
            StringValue::StrCast(Box::new(Value::Num(7.0))),
        ])
    );
}

#[test]
fn query_without_condition() {
    let query: Query = serde_json::from_str(r#"{ "$select": "id" }"#).unwrap();
    assert_eq!(query.select.as_deref(), Some("id"));
    assert_eq!(query.condition, None);
}

#[test]
fn rule() {
    let rule: AccessPermissionRule = serde_json::from_str(indoc! {r#"
        {
            "ACL": {
                "ATTRIBUTES": [{ "CLAIM": "department" }],
                "RIGHTS": ["READ", "UPDATE"],
                "ACCESS": "ALLOW"
            },
            "OBJECTS": [{ "IDENTIFIABLE": "(AAS)*" }],
            "FORMULA": { "$eq": [{ "$attribute": { "CLAIM": "department" } }, { "$strVal": "engineering" }] }
        }
    "#})
    .unwrap();

    assert_eq!(rule.access(), Access::Allow);
    assert!(rule.grants(Right::Read));
    assert!(!rule.grants(Right::Delete));
    assert_eq!(rule.attributes(), [AttributeItem::Claim("department".into())]);
    assert_eq!(rule.objects, [ObjectItem::identifiable("(AAS)*")]);
}

#[test]
fn disabled_means_deny() {
    let access: Access = serde_json::from_str(r#""DISABLED""#).unwrap();
    assert_eq!(access, Access::Deny);
}

#[test]
fn right_display_and_parse() {
    assert_eq!(Right::Execute.to_string(), "EXECUTE");
    assert_eq!("read".parse::<Right>().unwrap(), Right::Read);
    assert!("SUDO".parse::<Right>().is_err());
}
