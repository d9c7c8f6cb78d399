use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twinly::{EnvConfig, Twinly, document::load::load_rule_document};
use twinly_expr::{ObjectItem, Query, Right};
use twinly_pdp::{Claims, ObjectAttributes, StaticSubject};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(version, about, arg_required_else_help(true))]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Decide whether a subject holds a right on an object
    Decide {
        /// The right needed, e.g. READ
        #[arg(long)]
        right: Right,

        /// Identifiable target, e.g. `(AAS)urn:example:aas:1`
        #[arg(long, conflicts_with = "route", required_unless_present = "route")]
        identifiable: Option<String>,

        /// Route target, e.g. `/shells`
        #[arg(long)]
        route: Option<String>,

        /// JSON file with the subject's claims. Without it there is no subject.
        #[arg(long)]
        claims: Option<PathBuf>,

        /// JSON file mapping model field paths to values of the target object
        #[arg(long)]
        object_attributes: Option<PathBuf>,

        /// Rule document, overrides TWINLY_RULES_PATH
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Compile a query into a search request body
    Compile {
        /// JSON file with the query
        #[arg(long)]
        query: PathBuf,

        /// Target index, overrides TWINLY_SEARCH_INDEX
        #[arg(long)]
        index: Option<String>,

        #[arg(long, default_value_t = 0)]
        from: usize,

        #[arg(long)]
        size: Option<usize>,
    },

    /// Load and resolve a rule document, then exit
    CheckRules {
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(EnvFilter::from_env("TWINLY_LOG"))
        .init();

    let mut env_config = EnvConfig::load()?;

    match Cli::parse().command {
        Some(Command::Decide {
            right,
            identifiable,
            route,
            claims,
            object_attributes,
            rules,
        }) => {
            if let Some(rules) = rules {
                env_config.rules_path = rules;
            }
            let twinly = Twinly::configure(&env_config)?;

            let object = match (identifiable, route) {
                (Some(id), _) => ObjectItem::Identifiable(id),
                (None, Some(route)) => ObjectItem::Route(route),
                (None, None) => return Err(anyhow!("no target object")),
            };
            let subject = StaticSubject(match claims {
                Some(path) => Some(read_json::<Claims>(&path)?),
                None => None,
            });
            let object_attributes = match object_attributes {
                Some(path) => read_json::<ObjectAttributes>(&path)?,
                None => ObjectAttributes::default(),
            };

            let allowed = twinly
                .permission_resolver(subject)
                .decide(right, &object, &object_attributes)?;

            println!("{}", if allowed { "allow" } else { "deny" });
        }
        Some(Command::Compile {
            query,
            index,
            from,
            size,
        }) => {
            if let Some(index) = index {
                env_config.search_index = index;
            }
            let twinly = Twinly::with_rules(&env_config, vec![]);
            let query = read_json::<Query>(&query)?;
            let request = twinly.search_request(&query, from, size);

            let output = json!({
                "index": request.index,
                "result_type": twinly.result_type(&query),
                "body": request,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Some(Command::CheckRules { rules }) => {
            let path = rules.unwrap_or(env_config.rules_path);
            let rules = load_rule_document(&path)?;

            info!("twinly v{VERSION}");
            println!("{} rule(s) resolved from {}", rules.len(), path.display());
        }
        None => {}
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let source = fs::read_to_string(path).map_err(|err| anyhow!("{path:?}: {err}"))?;
    Ok(serde_json::from_str(&source)?)
}
