use std::{path::Path, sync::Arc};

use tracing::info;
use twinly_expr::{AccessPermissionRule, Query};
use twinly_pdp::{InMemoryRuleStore, PermissionResolver, SubjectInfoProvider};
use twinly_search::{SearchRequest, SearchRequestBuilder};

pub use env_config::EnvConfig;

pub mod document;
pub mod env_config;

#[cfg(test)]
mod tests;

/// Application state shared by access decisions and search compilation.
pub struct Twinly {
    rules: Arc<InMemoryRuleStore>,
    search: SearchRequestBuilder,
    model_name: String,
}

impl Twinly {
    /// Set up from configuration, loading the configured rule document.
    pub fn configure(env_config: &EnvConfig) -> anyhow::Result<Self> {
        let rules = document::load::load_rule_document(&env_config.rules_path)?;
        Ok(Self::with_rules(env_config, rules))
    }

    pub fn with_rules(env_config: &EnvConfig, rules: Vec<AccessPermissionRule>) -> Self {
        info!(index = %env_config.search_index, rules = rules.len(), "configured");

        Self {
            rules: Arc::new(InMemoryRuleStore::new(rules)),
            search: SearchRequestBuilder::new(env_config.search_index.clone())
                .default_page_size(env_config.default_page_size),
            model_name: env_config.model_name.clone(),
        }
    }

    /// Replace the active rules with the document at `path`.
    ///
    /// The active rules stay in place if the document does not resolve.
    pub fn reload_rules(&self, path: &Path) -> anyhow::Result<()> {
        let rules = document::load::load_rule_document(path)?;
        self.rules.replace(rules);
        Ok(())
    }

    pub fn permission_resolver<P: SubjectInfoProvider>(
        &self,
        subject: P,
    ) -> PermissionResolver<Arc<InMemoryRuleStore>, P> {
        PermissionResolver::new(self.rules.clone(), subject)
    }

    pub fn search_request(
        &self,
        query: &Query,
        from: usize,
        limit: Option<usize>,
    ) -> SearchRequest {
        self.search.build(query, from, limit)
    }

    pub fn result_type(&self, query: &Query) -> &str {
        twinly_search::result_type(query, &self.model_name)
    }
}
