//! Case definition types
//!
//! The authored schema ([`schema`]), its resolved rules ([`rules`]) and the
//! frozen [`Case`] handed to the engine.

pub mod rules;
pub mod schema;

pub use rules::{Rules, RulesConfig, THREAT_MAX, THREAT_MIN, clamp_threat};
pub use schema::*;

/// A validated case definition paired with its resolved rules.
///
/// Produced once at load time; the engine never reads [`RulesConfig`].
#[derive(Debug, Clone)]
pub struct Case {
    /// The authored definition
    pub definition: CaseDefinition,
    /// Rules with every default applied
    pub rules: Rules,
}

impl Case {
    /// Resolves the rules of `definition` and pairs them with it.
    #[must_use]
    pub fn new(definition: CaseDefinition) -> Self {
        let rules = Rules::resolve(&definition.rules);
        Self { definition, rules }
    }

    /// Case identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    /// Case title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.definition.title
    }
}
