//! Running probability that two persons share the same identity.

use crate::domain::model::MatchingRule;
use crate::utils::error::{MatchError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A definite match.
pub const MATCH: Decimal = Decimal::ONE;

/// A definite non-match.
pub const NO_MATCH: Decimal = Decimal::ZERO;

/// Audit entry: which rule moved the probability and by how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub rule_name: String,
    pub rule_description: String,
    pub rule_type: String,
    pub value: Decimal,
}

impl Contributor {
    fn from_rule(rule: &MatchingRule, value: Decimal) -> Self {
        Self {
            rule_name: rule.name().to_string(),
            rule_description: rule.description().to_string(),
            rule_type: rule.rule_type().to_string(),
            value,
        }
    }
}

/// Probability in `[0, 1]` plus the ordered list of rules that produced it.
///
/// Every mutation goes through this type so the range and the contributor
/// list stay consistent no matter which contributor is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbabilitySameIdentity {
    probability: Decimal,
    contributors: Vec<Contributor>,
}

impl ProbabilitySameIdentity {
    pub fn new(initial: Decimal) -> Result<Self> {
        if initial < NO_MATCH {
            return Err(MatchError::validation("Probability cannot be less than zero."));
        }
        if initial > MATCH {
            return Err(MatchError::validation("Probability cannot be more than one."));
        }
        Ok(Self {
            probability: initial,
            contributors: Vec::new(),
        })
    }

    /// Probability 1 with no contributor, for a person compared with itself.
    pub fn certain() -> Self {
        Self {
            probability: MATCH,
            contributors: Vec::new(),
        }
    }

    pub fn probability(&self) -> Decimal {
        self.probability
    }

    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }

    pub fn into_contributors(self) -> Vec<Contributor> {
        self.contributors
    }

    pub fn add_contribution(&mut self, rule: &MatchingRule, value: Decimal) {
        self.probability = (self.probability + value).clamp(NO_MATCH, MATCH);
        self.contributors.push(Contributor::from_rule(rule, value));
    }

    pub fn set_no_match(&mut self, rule: &MatchingRule) {
        self.probability = NO_MATCH;
        self.contributors.push(Contributor::from_rule(rule, NO_MATCH));
    }

    pub fn set_match(&mut self, rule: &MatchingRule) {
        self.probability = MATCH;
        self.contributors.push(Contributor::from_rule(rule, MATCH));
    }

    pub fn is_match(&self) -> bool {
        self.probability == MATCH
    }
}

impl Default for ProbabilitySameIdentity {
    fn default() -> Self {
        Self {
            probability: NO_MATCH,
            contributors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::registry::RuleRegistry;
    use crate::app::rules::LAST_NAME_EQUALS;

    fn rule() -> MatchingRule {
        let registry = RuleRegistry::with_defaults();
        MatchingRule::new(&registry, LAST_NAME_EQUALS, "last", "desc", true, vec![]).unwrap()
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(ProbabilitySameIdentity::new(Decimal::new(-1, 1)).is_err());
        assert!(ProbabilitySameIdentity::new(Decimal::new(11, 1)).is_err());
        assert_eq!(
            ProbabilitySameIdentity::new(Decimal::new(5, 1)).unwrap().probability(),
            Decimal::new(5, 1)
        );
    }

    #[test]
    fn test_default_starts_at_zero() {
        let probability = ProbabilitySameIdentity::default();
        assert_eq!(probability.probability(), NO_MATCH);
        assert!(probability.contributors().is_empty());
    }

    #[test]
    fn test_add_contribution_clamps() {
        let rule = rule();
        let mut probability = ProbabilitySameIdentity::default();

        probability.add_contribution(&rule, Decimal::new(7, 1));
        probability.add_contribution(&rule, Decimal::new(7, 1));
        assert_eq!(probability.probability(), MATCH);
        assert!(probability.is_match());

        probability.add_contribution(&rule, Decimal::new(-30, 1));
        assert_eq!(probability.probability(), NO_MATCH);

        let values: Vec<Decimal> = probability.contributors().iter().map(|c| c.value).collect();
        assert_eq!(values, vec![Decimal::new(7, 1), Decimal::new(7, 1), Decimal::new(-30, 1)]);
    }

    #[test]
    fn test_clamping_holds_for_any_sequence() {
        let rule = rule();
        let mut probability = ProbabilitySameIdentity::default();
        let steps = [9, -4, 13, -25, 6, 6, 6, -1, 100, -100, 3];
        for step in steps {
            probability.add_contribution(&rule, Decimal::new(step, 1));
            assert!(probability.probability() >= NO_MATCH);
            assert!(probability.probability() <= MATCH);
        }
        assert_eq!(probability.contributors().len(), steps.len());
    }

    #[test]
    fn test_terminal_states_record_contributor() {
        let rule = rule();
        let mut probability = ProbabilitySameIdentity::new(Decimal::new(5, 1)).unwrap();

        probability.set_no_match(&rule);
        assert_eq!(probability.probability(), NO_MATCH);
        assert_eq!(probability.contributors()[0].value, NO_MATCH);

        probability.set_match(&rule);
        assert!(probability.is_match());
        assert_eq!(probability.contributors()[1].value, MATCH);
        assert_eq!(probability.contributors()[1].rule_name, "last");
        assert_eq!(probability.contributors()[1].rule_type, LAST_NAME_EQUALS);
    }
}
