//! Wire form of an access rule document.

use std::collections::BTreeSet;

use serde::Deserialize;
use twinly_expr::{Access, AttributeItem, LogicalExpression, ObjectItem, Right};

#[derive(Deserialize, Debug)]
pub struct RuleDocument {
    #[serde(rename = "AllAccessPermissionRules")]
    pub all_access_permission_rules: AllAccessPermissionRules,
}

impl RuleDocument {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

/// Named definitions and the rules referring to them.
#[derive(Deserialize, Default, Debug)]
pub struct AllAccessPermissionRules {
    #[serde(rename = "DEFATTRIBUTES", default)]
    pub def_attributes: Vec<DefAttributes>,

    #[serde(rename = "DEFACLS", default)]
    pub def_acls: Vec<DefAcl>,

    #[serde(rename = "DEFOBJECTS", default)]
    pub def_objects: Vec<DefObjects>,

    #[serde(rename = "DEFFORMULAS", default)]
    pub def_formulas: Vec<DefFormula>,

    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

#[derive(Deserialize, Debug)]
pub struct DefAttributes {
    pub name: String,
    pub attributes: Vec<AttributeItem>,
}

#[derive(Deserialize, Debug)]
pub struct DefAcl {
    pub name: String,
    pub acl: AclEntry,
}

#[derive(Deserialize, Debug)]
pub struct DefObjects {
    pub name: String,
    pub objects: Vec<ObjectItem>,
}

#[derive(Deserialize, Debug)]
pub struct DefFormula {
    pub name: String,
    pub formula: LogicalExpression,
}

#[derive(Clone, Deserialize, Debug)]
pub struct AclEntry {
    #[serde(rename = "ATTRIBUTES", default)]
    pub attributes: Vec<AttributeItem>,

    #[serde(rename = "USEATTRIBUTES")]
    pub use_attributes: Option<String>,

    #[serde(rename = "RIGHTS")]
    pub rights: BTreeSet<Right>,

    #[serde(rename = "ACCESS")]
    pub access: Access,
}

/// One rule, each part either inline or by reference to a definition.
#[derive(Deserialize, Debug)]
pub struct RuleEntry {
    #[serde(rename = "ACL")]
    pub acl: Option<AclEntry>,

    #[serde(rename = "USEACL")]
    pub use_acl: Option<String>,

    #[serde(rename = "OBJECTS", default)]
    pub objects: Vec<ObjectItem>,

    #[serde(rename = "USEOBJECTS", default)]
    pub use_objects: Vec<String>,

    #[serde(rename = "FORMULA")]
    pub formula: Option<LogicalExpression>,

    #[serde(rename = "USEFORMULA")]
    pub use_formula: Option<String>,
}
