//! Compilation of search queries into the search backend's query DSL.

pub mod compiler;
pub mod query;
pub mod request;

pub use compiler::QueryCompiler;
pub use query::{BoolQuery, RangeBound, SearchQuery};
pub use request::{SearchRequest, SearchRequestBuilder, result_type};

#[cfg(test)]
mod test_compile;
