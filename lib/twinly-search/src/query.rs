//! Backend query representation and its JSON form.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue, json};
use twinly_expr::Scalar;

#[derive(Clone, PartialEq, Debug)]
pub enum SearchQuery {
    MatchAll,
    MatchNone,
    Term {
        field: String,
        value: Scalar,
    },
    Range {
        field: String,
        bound: RangeBound,
        value: Scalar,
    },
    Wildcard {
        field: String,
        pattern: String,
    },
    Regexp {
        field: String,
        pattern: String,
    },
    Exists {
        field: String,
    },
    /// A painless script query
    Script {
        source: String,
    },
    Bool(BoolQuery),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RangeBound {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeBound {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }
}

#[derive(Clone, PartialEq, Default, Debug)]
pub struct BoolQuery {
    pub must: Vec<SearchQuery>,
    pub should: Vec<SearchQuery>,
    pub must_not: Vec<SearchQuery>,
    pub minimum_should_match: Option<String>,
}

impl SearchQuery {
    pub fn must(clauses: Vec<SearchQuery>) -> Self {
        Self::Bool(BoolQuery {
            must: clauses,
            ..Default::default()
        })
    }

    /// At least one of the clauses must match.
    pub fn should(clauses: Vec<SearchQuery>) -> Self {
        Self::Bool(BoolQuery {
            should: clauses,
            minimum_should_match: Some("1".to_string()),
            ..Default::default()
        })
    }

    pub fn must_not(clause: SearchQuery) -> Self {
        Self::Bool(BoolQuery {
            must_not: vec![clause],
            ..Default::default()
        })
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::MatchAll => json!({ "match_all": {} }),
            Self::MatchNone => json!({ "match_none": {} }),
            Self::Term { field, value } => {
                keyed("term", keyed(field, json!({ "value": value })))
            }
            Self::Range {
                field,
                bound,
                value,
            } => keyed(
                "range",
                keyed(field, keyed(bound.as_str(), json!(value))),
            ),
            Self::Wildcard { field, pattern } => {
                keyed("wildcard", keyed(field, json!({ "value": pattern })))
            }
            Self::Regexp { field, pattern } => {
                keyed("regexp", keyed(field, json!({ "value": pattern })))
            }
            Self::Exists { field } => json!({ "exists": { "field": field } }),
            Self::Script { source } => json!({
                "script": {
                    "script": { "source": source, "lang": "painless" }
                }
            }),
            Self::Bool(query) => {
                let mut clauses = Map::new();
                for (occur, queries) in [
                    ("must", &query.must),
                    ("should", &query.should),
                    ("must_not", &query.must_not),
                ] {
                    if !queries.is_empty() {
                        clauses.insert(
                            occur.to_string(),
                            queries.iter().map(SearchQuery::to_json).collect(),
                        );
                    }
                }
                if let Some(minimum) = &query.minimum_should_match {
                    clauses.insert("minimum_should_match".to_string(), json!(minimum));
                }
                keyed("bool", JsonValue::Object(clauses))
            }
        }
    }
}

impl Serialize for SearchQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn keyed(key: &str, value: JsonValue) -> JsonValue {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    JsonValue::Object(map)
}
