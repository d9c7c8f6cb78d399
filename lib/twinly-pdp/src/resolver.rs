//! Permission resolver, the entry point of the access-control boundary.

use tracing::debug;
use twinly_expr::{Access, KeywordFieldResolver, ObjectItem, Right};

use crate::{
    attributes::{Claims, ResolvedAttributes, referenced_attributes},
    clock::{Clock, SystemClock},
    interpreter::{Interpreter, ObjectAttributes},
    rule_store::RuleStore,
};

#[derive(thiserror::Error, Debug)]
pub enum PermissionError {
    #[error("no subject information available")]
    NoSubject,
}

/// Provides the claims of the subject making the current request.
pub trait SubjectInfoProvider {
    /// `None` when the request carries no subject.
    fn subject_claims(&self) -> Option<Claims>;
}

/// A subject with a fixed set of claims.
#[derive(Clone, Default, Debug)]
pub struct StaticSubject(pub Option<Claims>);

impl SubjectInfoProvider for StaticSubject {
    fn subject_claims(&self) -> Option<Claims> {
        self.0.clone()
    }
}

pub struct PermissionResolver<S, P, C = SystemClock> {
    store: S,
    subject: P,
    clock: C,
    field_resolver: KeywordFieldResolver,
}

impl<S: RuleStore, P: SubjectInfoProvider> PermissionResolver<S, P> {
    pub fn new(store: S, subject: P) -> Self {
        Self {
            store,
            subject,
            clock: SystemClock,
            field_resolver: KeywordFieldResolver,
        }
    }
}

impl<S: RuleStore, P: SubjectInfoProvider, C: Clock> PermissionResolver<S, P, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> PermissionResolver<S, P, C2> {
        PermissionResolver {
            store: self.store,
            subject: self.subject,
            clock,
            field_resolver: self.field_resolver,
        }
    }

    /// Decide whether the current subject holds `right` on `object`.
    ///
    /// Access is granted when at least one applicable `ALLOW` rule's formula holds.
    /// `DENY` rules are filtered out and have no effect on the outcome.
    pub fn decide(
        &self,
        right: Right,
        object: &ObjectItem,
        object_attributes: &ObjectAttributes,
    ) -> Result<bool, PermissionError> {
        let claims = self
            .subject
            .subject_claims()
            .ok_or(PermissionError::NoSubject)?;

        let rules = self.store.get_filtered_rules(right, Access::Allow, object);
        debug!(%right, ?object, candidates = rules.len(), "deciding");

        let allowed = rules.iter().any(|rule| {
            let attributes = ResolvedAttributes::resolve(
                rule.attributes()
                    .iter()
                    .chain(referenced_attributes(&rule.formula)),
                &claims,
                &self.clock,
            );

            Interpreter {
                object_attributes,
                attributes: &attributes,
                field_resolver: &self.field_resolver,
            }
            .eval(&rule.formula)
        });

        debug!(%right, ?object, allowed, "decided");

        Ok(allowed)
    }
}
