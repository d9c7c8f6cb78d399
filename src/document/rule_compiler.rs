//! Resolution of `USE*` references in a rule document into flat access rules.

use fnv::FnvHashMap;
use twinly_expr::{AccessPermissionRule, Acl, AttributeItem, LogicalExpression, ObjectItem};

use super::{
    error::{RuleDocumentError, RuleDocumentErrorKind},
    rule_document::{AclEntry, AllAccessPermissionRules, RuleDocument, RuleEntry},
};

#[derive(Default)]
struct Errors {
    errors: Vec<RuleDocumentError>,
}

impl Errors {
    fn push(&mut self, rule: Option<usize>, kind: RuleDocumentErrorKind) {
        self.errors.push(RuleDocumentError { kind, rule });
    }
}

struct Definitions {
    attributes: FnvHashMap<String, Vec<AttributeItem>>,
    acls: FnvHashMap<String, AclEntry>,
    objects: FnvHashMap<String, Vec<ObjectItem>>,
    formulas: FnvHashMap<String, LogicalExpression>,
}

/// Resolve every rule of the document.
///
/// All errors are collected, the document either resolves completely or not at all.
pub fn compile_rule_document(
    document: RuleDocument,
) -> Result<Vec<AccessPermissionRule>, Vec<RuleDocumentError>> {
    let AllAccessPermissionRules {
        def_attributes,
        def_acls,
        def_objects,
        def_formulas,
        rules,
    } = document.all_access_permission_rules;

    let mut errors = Errors::default();

    let definitions = Definitions {
        attributes: named(
            def_attributes.into_iter().map(|def| (def.name, def.attributes)),
            &mut errors,
        ),
        acls: named(def_acls.into_iter().map(|def| (def.name, def.acl)), &mut errors),
        objects: named(
            def_objects.into_iter().map(|def| (def.name, def.objects)),
            &mut errors,
        ),
        formulas: named(
            def_formulas.into_iter().map(|def| (def.name, def.formula)),
            &mut errors,
        ),
    };

    let mut compiled = Vec::with_capacity(rules.len());

    for (index, entry) in rules.into_iter().enumerate() {
        if let Some(rule) = compile_rule(index, entry, &definitions, &mut errors) {
            compiled.push(rule);
        }
    }

    if errors.errors.is_empty() {
        Ok(compiled)
    } else {
        Err(errors.errors)
    }
}

fn named<T>(
    definitions: impl Iterator<Item = (String, T)>,
    errors: &mut Errors,
) -> FnvHashMap<String, T> {
    let mut map = FnvHashMap::default();

    for (name, definition) in definitions {
        if map.contains_key(&name) {
            errors.push(None, RuleDocumentErrorKind::NameDefinedMultipleTimes(name));
            continue;
        }
        map.insert(name, definition);
    }

    map
}

fn compile_rule(
    index: usize,
    entry: RuleEntry,
    definitions: &Definitions,
    errors: &mut Errors,
) -> Option<AccessPermissionRule> {
    let rule = Some(index);
    let error_count = errors.errors.len();

    let acl_entry = match (entry.acl, entry.use_acl) {
        (Some(acl), None) => Some(acl),
        (None, Some(name)) => match definitions.acls.get(&name) {
            Some(acl) => Some(acl.clone()),
            None => {
                errors.push(rule, RuleDocumentErrorKind::UnresolvedAcl(name));
                None
            }
        },
        (Some(_), Some(_)) => {
            errors.push(rule, RuleDocumentErrorKind::Ambiguous("ACL"));
            None
        }
        (None, None) => {
            errors.push(rule, RuleDocumentErrorKind::AclMissing);
            None
        }
    };

    let acl = acl_entry.map(|entry| {
        let mut attributes = entry.attributes;
        if let Some(name) = entry.use_attributes {
            match definitions.attributes.get(&name) {
                Some(defined) => attributes.extend(defined.iter().cloned()),
                None => errors.push(rule, RuleDocumentErrorKind::UnresolvedAttributes(name)),
            }
        }

        Acl {
            access: entry.access,
            rights: entry.rights,
            attributes,
        }
    });

    let mut objects = entry.objects;
    for name in entry.use_objects {
        match definitions.objects.get(&name) {
            Some(defined) => objects.extend(defined.iter().cloned()),
            None => errors.push(rule, RuleDocumentErrorKind::UnresolvedObjects(name)),
        }
    }

    let formula = match (entry.formula, entry.use_formula) {
        (Some(formula), None) => Some(formula),
        (None, Some(name)) => match definitions.formulas.get(&name) {
            Some(formula) => Some(formula.clone()),
            None => {
                errors.push(rule, RuleDocumentErrorKind::UnresolvedFormula(name));
                None
            }
        },
        (Some(_), Some(_)) => {
            errors.push(rule, RuleDocumentErrorKind::Ambiguous("FORMULA"));
            None
        }
        (None, None) => {
            errors.push(rule, RuleDocumentErrorKind::FormulaMissing);
            None
        }
    };

    if errors.errors.len() > error_count {
        return None;
    }

    Some(AccessPermissionRule {
        acl: acl?,
        objects,
        formula: formula?,
    })
}
