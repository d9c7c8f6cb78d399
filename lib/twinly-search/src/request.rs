//! Search request assembly: pagination, projection and ordering around a compiled query.

use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use twinly_expr::{FieldResolver, KeywordFieldResolver, Query};

use crate::{compiler::QueryCompiler, query::SearchQuery};

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Result type reported for queries with a `$select` projection.
pub const IDENTIFIER_RESULT_TYPE: &str = "Identifier";

/// Fields returned when the query selects `id`.
const ID_FIELDS: &[&str] = &["id"];

/// Sort key giving a stable order across pages.
const SORT_FIELD: &str = "id.keyword";

/// A search request body, sent to `/<index>/_search`.
#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct SearchRequest {
    #[serde(skip)]
    pub index: String,
    pub query: SearchQuery,
    pub from: usize,
    pub size: usize,
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,
    pub sort: Vec<JsonValue>,
}

#[derive(Clone, Debug)]
pub struct SearchRequestBuilder<R = KeywordFieldResolver> {
    index: String,
    default_page_size: usize,
    compiler: QueryCompiler<R>,
}

impl SearchRequestBuilder {
    pub fn new(index: impl Into<String>) -> Self {
        Self::with_compiler(index, QueryCompiler::default())
    }
}

impl<R: FieldResolver> SearchRequestBuilder<R> {
    pub fn with_compiler(index: impl Into<String>, compiler: QueryCompiler<R>) -> Self {
        Self {
            index: index.into(),
            default_page_size: DEFAULT_PAGE_SIZE,
            compiler,
        }
    }

    pub fn default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Build the request for one page. A missing or zero `limit` uses the default page size.
    pub fn build(&self, query: &Query, from: usize, limit: Option<usize>) -> SearchRequest {
        let source = match query.select.as_deref() {
            Some("id") => Some(ID_FIELDS.iter().map(|field| field.to_string()).collect()),
            _ => None,
        };

        SearchRequest {
            index: self.index.clone(),
            query: self.compiler.compile(query),
            from,
            size: limit
                .filter(|limit| *limit > 0)
                .unwrap_or(self.default_page_size),
            source,
            sort: vec![json!({ SORT_FIELD: { "order": "asc" } })],
        }
    }
}

/// The type name of the items a query returns.
pub fn result_type<'a>(query: &Query, model_name: &'a str) -> &'a str {
    match query.select.as_deref() {
        Some(select) if !select.is_empty() => IDENTIFIER_RESULT_TYPE,
        _ => model_name,
    }
}
