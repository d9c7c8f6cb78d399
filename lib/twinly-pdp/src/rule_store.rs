use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;
use twinly_expr::{Access, AccessPermissionRule, ObjectItem, Right};

/// Source of access rules.
pub trait RuleStore {
    /// A snapshot of all rules.
    fn rules(&self) -> Arc<Vec<AccessPermissionRule>>;

    /// Rules granting `right` with the given `access` that apply to `object`.
    fn get_filtered_rules(
        &self,
        right: Right,
        access: Access,
        object: &ObjectItem,
    ) -> Vec<AccessPermissionRule> {
        self.rules()
            .iter()
            .filter(|rule| rule.access() == access && rule.grants(right))
            .filter(|rule| object_matches(rule, object))
            .cloned()
            .collect()
    }
}

/// Whether the rule's object list applies to the target object.
///
/// Only rules with exactly one object entry are supported. `ROUTE` matches by
/// equality, `IDENTIFIABLE` by equality or the `(AAS)*` wildcard. Other kinds never match.
pub fn object_matches(rule: &AccessPermissionRule, target: &ObjectItem) -> bool {
    let [object] = rule.objects.as_slice() else {
        return false;
    };

    match (object, target) {
        (ObjectItem::Route(route), ObjectItem::Route(target)) => route == target,
        (ObjectItem::Identifiable(id), ObjectItem::Identifiable(target)) => {
            id == ObjectItem::IDENTIFIABLE_WILDCARD || id == target
        }
        _ => false,
    }
}

/// Rules held in memory, replaceable while decisions are running.
#[derive(Default)]
pub struct InMemoryRuleStore {
    rules: ArcSwap<Vec<AccessPermissionRule>>,
}

impl InMemoryRuleStore {
    pub fn new(rules: Vec<AccessPermissionRule>) -> Self {
        Self {
            rules: ArcSwap::from_pointee(rules),
        }
    }

    pub fn replace(&self, rules: Vec<AccessPermissionRule>) {
        info!(count = rules.len(), "access rules replaced");
        self.rules.store(Arc::new(rules));
    }
}

impl RuleStore for InMemoryRuleStore {
    fn rules(&self) -> Arc<Vec<AccessPermissionRule>> {
        self.rules.load_full()
    }
}

impl<S: RuleStore> RuleStore for Arc<S> {
    fn rules(&self) -> Arc<Vec<AccessPermissionRule>> {
        (**self).rules()
    }
}
