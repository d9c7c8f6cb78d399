use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct EnvConfig {
    /// The access rule document to load.
    pub rules_path: PathBuf,

    /// Index that compiled search requests target.
    pub search_index: String,

    /// Page size used when a query gives no limit.
    pub default_page_size: usize,

    /// Result type reported for queries without `$select`
    pub model_name: String,
}

impl EnvConfig {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("TWINLY_"))
            .extract()
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("/etc/twinly/rules.json"),
            search_index: "shells".to_string(),
            default_page_size: twinly_search::request::DEFAULT_PAGE_SIZE,
            model_name: "AssetAdministrationShell".to_string(),
        }
    }
}
