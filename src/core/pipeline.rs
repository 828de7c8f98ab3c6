//! Chain-of-responsibility plumbing shared by the executor and the contributors.
//!
//! A strategy runs as a chain of steps. Each contributor receives the
//! accumulator and a [`Next`] continuation for the rules after it: it either
//! updates the accumulator and calls [`Next::run`] to keep going, or returns
//! without calling it to end the pipeline early.

use crate::domain::model::{ContributorDescriptor, MatchingRule, Person};
use crate::domain::ports::ContributorRegistry;
use crate::domain::probability::ProbabilitySameIdentity;
use crate::utils::error::Result;

/// A scoring unit a rule can point at.
pub trait RuleContributor: Send + Sync {
    /// Type identifier, description and the parameters this contributor reads.
    fn descriptor(&self) -> ContributorDescriptor;

    fn apply(
        &self,
        rule: &MatchingRule,
        first: &Person,
        second: &Person,
        probability: ProbabilitySameIdentity,
        next: Next<'_>,
    ) -> Result<ProbabilitySameIdentity>;
}

/// The remainder of a running pipeline.
pub struct Next<'a> {
    rules: &'a [MatchingRule],
    registry: &'a dyn ContributorRegistry,
    first: &'a Person,
    second: &'a Person,
}

impl<'a> Next<'a> {
    pub fn new(
        rules: &'a [MatchingRule],
        registry: &'a dyn ContributorRegistry,
        first: &'a Person,
        second: &'a Person,
    ) -> Self {
        Self {
            rules,
            registry,
            first,
            second,
        }
    }

    /// A continuation with nothing left to run; hands the accumulator straight back.
    pub fn terminal(
        registry: &'a dyn ContributorRegistry,
        first: &'a Person,
        second: &'a Person,
    ) -> Self {
        Self::new(&[], registry, first, second)
    }

    /// Number of rules not yet visited.
    pub fn remaining(&self) -> usize {
        self.rules.len()
    }

    pub fn run(self, probability: ProbabilitySameIdentity) -> Result<ProbabilitySameIdentity> {
        let Some((rule, rest)) = self.rules.split_first() else {
            return Ok(probability);
        };

        // a definite match ends the pipeline wherever it happened
        if probability.is_match() {
            tracing::debug!(
                rule = rule.name(),
                skipped = self.remaining(),
                "probability already 1, skipping remaining rules"
            );
            return Ok(probability);
        }

        let next = Next {
            rules: rest,
            ..self
        };

        if !rule.is_enabled() {
            tracing::debug!(rule = rule.name(), "rule disabled, skipping");
            return next.run(probability);
        }

        let contributor = self.registry.resolve(rule.rule_type())?;
        contributor.apply(rule, self.first, self.second, probability, next)
    }
}
