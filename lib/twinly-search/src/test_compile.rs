use indoc::indoc;
use serde_json::{Value as JsonValue, json};
use twinly_expr::{KeywordFieldResolver, Query};

use crate::{
    QueryCompiler, SearchRequestBuilder, compiler::escape_wildcard, request::DEFAULT_PAGE_SIZE,
    result_type,
};

#[track_caller]
fn compile(query: &str) -> JsonValue {
    let query: Query = serde_json::from_str(query).unwrap();
    QueryCompiler::new(KeywordFieldResolver).compile(&query).to_json()
}

#[test]
fn no_condition_matches_all() {
    assert_eq!(compile("{}"), json!({ "match_all": {} }));
}

#[test]
fn eq_is_term() {
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$eq": [{ "$field": "$aas#idShort" }, { "$strVal": "Motor1" }] } }
        "#}),
        json!({ "term": { "idShort.keyword": { "value": "Motor1" } } })
    );
}

#[test]
fn ne_is_must_not_term() {
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$ne": [{ "$field": "$aas#idShort" }, { "$strVal": "Motor1" }] } }
        "#}),
        json!({
            "bool": { "must_not": [{ "term": { "idShort.keyword": { "value": "Motor1" } } }] }
        })
    );
}

#[test]
fn ranges_keep_typed_scalars() {
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$and": [
                { "$ge": [{ "$field": "$sme#value" }, { "$numVal": 10 }] },
                { "$lt": [{ "$field": "$sm#validTo" }, { "$dateTimeVal": "2024-01-01T00:00:00Z" }] }
            ] } }
        "#}),
        json!({
            "bool": { "must": [
                { "range": { "value.keyword": { "gte": 10.0 } } },
                { "range": { "validTo.keyword": { "lt": "2024-01-01T00:00:00.000Z" } } }
            ] }
        })
    );
}

#[test]
fn field_on_the_right_mirrors_the_operator() {
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$gt": [{ "$numVal": 5 }, { "$field": "$sm#revision" }] } }
        "#}),
        json!({ "range": { "revision": { "lt": 5.0 } } })
    );
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$eq": [{ "$strVal": "x" }, { "$field": "$aas#id" }] } }
        "#}),
        json!({ "term": { "id.keyword": { "value": "x" } } })
    );
}

#[test]
fn or_and_not() {
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$or": [
                { "$eq": [{ "$field": "$aas#idShort" }, { "$strVal": "a" }] },
                { "$not": { "$eq": [{ "$field": "$aas#idShort" }, { "$strVal": "b" }] } }
            ] } }
        "#}),
        json!({
            "bool": {
                "should": [
                    { "term": { "idShort.keyword": { "value": "a" } } },
                    { "bool": { "must_not": [{ "term": { "idShort.keyword": { "value": "b" } } }] } }
                ],
                "minimum_should_match": "1"
            }
        })
    );
}

#[test]
fn string_operations() {
    let contains = compile(indoc! {r#"
        { "$condition": { "$contains": [{ "$field": "$aas#idShort" }, { "$strVal": "a*b" }] } }
    "#});
    let starts_with = compile(indoc! {r#"
        { "$condition": { "$starts-with": [{ "$field": "$aas#idShort" }, { "$strVal": "Mo?" }] } }
    "#});
    let ends_with = compile(indoc! {r#"
        { "$condition": { "$ends-with": [{ "$strVal": "tor" }, { "$field": "$aas#idShort" }] } }
    "#});
    let regex = compile(indoc! {r#"
        { "$condition": { "$regex": [{ "$field": "$aas#idShort" }, { "$strVal": "^Mo.*[0-9]$" }] } }
    "#});

    assert_eq!(
        contains,
        json!({ "wildcard": { "idShort.keyword": { "value": "*a\\*b*" } } })
    );
    assert_eq!(
        starts_with,
        json!({ "wildcard": { "idShort.keyword": { "value": "Mo\\?*" } } })
    );
    assert_eq!(
        ends_with,
        json!({ "wildcard": { "idShort.keyword": { "value": "*tor" } } })
    );
    assert_eq!(
        regex,
        json!({ "regexp": { "idShort.keyword": { "value": "Mo.*[0-9]" } } })
    );
}

#[test]
fn wildcard_escaping() {
    assert_eq!(escape_wildcard(r"a\b*c?d"), r"a\\b\*c\?d");
    assert_eq!(escape_wildcard("plain"), "plain");
}

#[test]
fn field_to_field_uses_guarded_script() {
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$eq": [{ "$field": "$aas#idShort" }, { "$field": "$aas#id" }] } }
        "#}),
        json!({
            "bool": { "must": [
                { "exists": { "field": "idShort.keyword" } },
                { "exists": { "field": "id.keyword" } },
                { "script": { "script": {
                    "source": "doc['idShort.keyword'].value == doc['id.keyword'].value",
                    "lang": "painless"
                } } }
            ] }
        })
    );
}

#[test]
fn field_to_field_with_casts() {
    let query = compile(indoc! {r#"
        { "$condition": { "$gt": [
            { "$numCast": { "$field": "$sme.temperature#value" } },
            { "$numCast": { "$field": "$sme.threshold#value" } }
        ] } }
    "#});

    assert_eq!(
        query["bool"]["must"][2]["script"]["script"]["source"],
        "Double.parseDouble(doc['value.keyword'].value.toString()) > Double.parseDouble(doc['value.keyword'].value.toString())"
    );
}

#[test]
fn string_field_to_field() {
    let query = compile(indoc! {r#"
        { "$condition": { "$starts-with": [{ "$field": "$aas#idShort" }, { "$field": "$cd#category" }] } }
    "#});

    assert_eq!(
        query["bool"]["must"][2]["script"]["script"]["source"],
        "doc['idShort.keyword'].value.startsWith(doc['category.keyword'].value)"
    );
}

#[test]
fn quoted_field_names_never_reach_a_script() {
    let match_all = json!({ "match_all": {} });

    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$eq": [
                { "$field": "$aas#x'].value != null || true || doc['y" },
                { "$field": "$aas#idShort" }
            ] } }
        "#}),
        match_all
    );
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$contains": [
                { "$field": "$aas#idShort" },
                { "$field": "$cd#category\\" }
            ] } }
        "#}),
        match_all
    );
}

#[test]
fn booleans_and_match() {
    assert_eq!(
        compile(r#"{ "$condition": { "$boolean": true } }"#),
        json!({ "match_all": {} })
    );
    assert_eq!(
        compile(r#"{ "$condition": { "$boolean": false } }"#),
        json!({ "match_none": {} })
    );
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$match": [{ "$eq": [{ "$field": "$aas#idShort" }, { "$strVal": "a" }] }] } }
        "#}),
        json!({ "bool": { "must": [{ "term": { "idShort.keyword": { "value": "a" } } }] } })
    );
}

#[test]
fn unresolvable_parts_fall_back_to_match_all() {
    let match_all = json!({ "match_all": {} });

    assert_eq!(
        compile(r#"{ "$condition": { "$eq": [{ "$field": "$nope#x" }, { "$strVal": "a" }] } }"#),
        match_all
    );
    assert_eq!(
        compile(r#"{ "$condition": { "$eq": [{ "$field": "$aas#idShort" }] } }"#),
        match_all
    );
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$eq": [{ "$field": "$aas#idShort" }, { "$attribute": { "CLAIM": "sub" } }] } }
        "#}),
        match_all
    );
    assert_eq!(compile(r#"{ "$condition": { "$and": [] } }"#), match_all);
}

#[test]
fn non_finite_number_casts_match_all() {
    let match_all = json!({ "match_all": {} });

    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$eq": [{ "$field": "$sm#value" }, { "$numCast": { "$strVal": "inf" } }] } }
        "#}),
        match_all
    );
    assert_eq!(
        compile(indoc! {r#"
            { "$condition": { "$gt": [{ "$field": "$sm#value" }, { "$numCast": { "$strVal": "NaN" } }] } }
        "#}),
        match_all
    );
}

#[test]
fn request_assembly() {
    let query: Query = serde_json::from_str(indoc! {r#"
        { "$select": "id", "$condition": { "$eq": [{ "$field": "$aas#idShort" }, { "$strVal": "Motor1" }] } }
    "#})
    .unwrap();

    let request = SearchRequestBuilder::new("shells").build(&query, 20, Some(10));

    assert_eq!(request.index, "shells");
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "query": { "term": { "idShort.keyword": { "value": "Motor1" } } },
            "from": 20,
            "size": 10,
            "_source": ["id"],
            "sort": [{ "id.keyword": { "order": "asc" } }]
        })
    );
}

#[test]
fn default_page_size() {
    let query = Query::default();
    let builder = SearchRequestBuilder::new("shells");

    assert_eq!(builder.build(&query, 0, None).size, DEFAULT_PAGE_SIZE);
    assert_eq!(builder.build(&query, 0, Some(0)).size, DEFAULT_PAGE_SIZE);
    assert_eq!(
        builder.clone().default_page_size(25).build(&query, 0, None).size,
        25
    );
    assert_eq!(builder.build(&query, 0, None).source, None);
}

#[test]
fn result_types() {
    let select = Query {
        select: Some("id".into()),
        condition: None,
    };

    assert_eq!(result_type(&select, "AssetAdministrationShell"), "Identifier");
    assert_eq!(
        result_type(&Query::default(), "AssetAdministrationShell"),
        "AssetAdministrationShell"
    );
}
