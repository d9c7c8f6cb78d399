//! Mapping from model field paths to physical index field names.

/// Resolves a model field path such as `$aas#idShort` to the field name used by the backend.
pub trait FieldResolver {
    /// Returns `None` when the path does not start with a known model prefix.
    fn resolve(&self, path: &str) -> Option<String>;

    /// Whether the path addresses a model field at all.
    fn is_model_path(&self, path: &str) -> bool {
        strip_model_prefix(path).is_some()
    }
}

pub const KEYWORD_SUFFIX: &str = ".keyword";

const MODEL_PREFIXES: &[&str] = &["$aas#", "$sm#", "$cd#", "$aasdesc#", "$smdesc#"];

/// Field name fragments that are indexed as analyzed text and need the exact-match sub-field.
///
/// This is a substring test, so `identity` matches `id`.
const KEYWORD_FIELDS: &[&str] = &[
    "name",
    "value",
    "idShort",
    "id",
    "type",
    "assetKind",
    "assetType",
    "globalAssetId",
    "externalSubjectId",
];

/// The default resolver: strips the model prefix and targets `.keyword` sub-fields.
#[derive(Clone, Copy, Default, Debug)]
pub struct KeywordFieldResolver;

impl FieldResolver for KeywordFieldResolver {
    fn resolve(&self, path: &str) -> Option<String> {
        let name = strip_model_prefix(path)?.replace("[]", "");
        if name.is_empty() {
            return None;
        }

        if KEYWORD_FIELDS.iter().any(|keyword| name.contains(keyword)) {
            Some(format!("{name}{KEYWORD_SUFFIX}"))
        } else {
            Some(name)
        }
    }
}

/// Strips the model prefix.
///
/// `$sme` may carry a qualifier (`$sme.temp#value`, `$sme[0]#value`) before the `#`.
fn strip_model_prefix(path: &str) -> Option<&str> {
    if let Some(rest) = path.strip_prefix("$sme") {
        let (_qualifier, field) = rest.split_once('#')?;
        return Some(field);
    }

    MODEL_PREFIXES
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
}
