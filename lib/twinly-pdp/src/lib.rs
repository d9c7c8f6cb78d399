//! Policy decision point for attribute-based access rules.

pub mod attributes;
pub mod clock;
pub mod interpreter;
pub mod resolver;
pub mod rule_store;

pub use attributes::{ClaimValue, Claims, ResolvedAttributes};
pub use clock::{Clock, FixedClock, SystemClock};
pub use interpreter::{Interpreter, ObjectAttributes};
pub use resolver::{PermissionError, PermissionResolver, StaticSubject, SubjectInfoProvider};
pub use rule_store::{InMemoryRuleStore, RuleStore};
