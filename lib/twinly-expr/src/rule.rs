use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::expr::{AttributeItem, LogicalExpression};

/// An action category a rule may grant.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Debug,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Right {
    Create,
    Read,
    Update,
    Delete,
    Execute,
    View,
    All,
    Tree,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Access {
    #[serde(rename = "ALLOW")]
    Allow,
    #[serde(rename = "DENY", alias = "DISABLED")]
    Deny,
}

/// The target a rule applies to.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum ObjectItem {
    #[serde(rename = "ROUTE")]
    Route(String),
    /// `(AAS)<id>`, or the wildcard `(AAS)*`
    #[serde(rename = "IDENTIFIABLE")]
    Identifiable(String),
    #[serde(rename = "REFERABLE")]
    Referable(String),
    #[serde(rename = "FRAGMENT")]
    Fragment(String),
    #[serde(rename = "DESCRIPTOR")]
    Descriptor(String),
}

impl ObjectItem {
    pub const IDENTIFIABLE_WILDCARD: &'static str = "(AAS)*";

    pub fn route(route: impl Into<String>) -> Self {
        Self::Route(route.into())
    }

    pub fn identifiable(id: impl Into<String>) -> Self {
        Self::Identifiable(id.into())
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Acl {
    #[serde(rename = "ACCESS")]
    pub access: Access,

    #[serde(rename = "RIGHTS")]
    pub rights: BTreeSet<Right>,

    /// Subject and environment attributes the formula may reference
    #[serde(rename = "ATTRIBUTES", default)]
    pub attributes: Vec<AttributeItem>,
}

/// A fully resolved access rule.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AccessPermissionRule {
    #[serde(rename = "ACL")]
    pub acl: Acl,

    #[serde(rename = "OBJECTS")]
    pub objects: Vec<ObjectItem>,

    #[serde(rename = "FORMULA")]
    pub formula: LogicalExpression,
}

impl AccessPermissionRule {
    pub fn access(&self) -> Access {
        self.acl.access
    }

    pub fn grants(&self, right: Right) -> bool {
        self.acl.rights.contains(&right)
    }

    pub fn attributes(&self) -> &[AttributeItem] {
        &self.acl.attributes
    }
}
