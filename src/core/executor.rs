use crate::core::pipeline::Next;
use crate::domain::model::{MatchingStrategy, Person};
use crate::domain::ports::ContributorRegistry;
use crate::domain::probability::ProbabilitySameIdentity;
use crate::utils::error::{MatchError, Result};
use std::sync::Arc;

/// Runs a strategy's rules over two persons.
///
/// The executor owns no mutable state; every call starts from a fresh
/// accumulator, so one instance can be shared between tasks.
#[derive(Clone)]
pub struct StrategyExecutor {
    registry: Arc<dyn ContributorRegistry>,
}

impl StrategyExecutor {
    pub fn new(registry: Arc<dyn ContributorRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<dyn ContributorRegistry> {
        &self.registry
    }

    /// Computes the probability that `first` and `second` are the same identity.
    ///
    /// Fails with `RuleNotRegistered` as soon as an enabled rule points at a
    /// type the registry does not know; no partial result is returned.
    pub fn compute_probability(
        &self,
        strategy: &MatchingStrategy,
        first: &Person,
        second: &Person,
    ) -> Result<ProbabilitySameIdentity> {
        if strategy.rules().is_empty() {
            return Err(MatchError::validation("strategy rules cannot be null or empty."));
        }

        if first.id() == second.id() {
            tracing::debug!(person = %first.id(), "same person on both sides, returning match");
            return Ok(ProbabilitySameIdentity::certain());
        }

        let pipeline = Next::new(strategy.rules(), self.registry.as_ref(), first, second);
        let result = pipeline.run(ProbabilitySameIdentity::default())?;

        tracing::debug!(
            strategy = strategy.name(),
            probability = %result.probability(),
            contributors = result.contributors().len(),
            "strategy executed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::registry::RuleRegistry;
    use crate::core::pipeline::RuleContributor;
    use crate::domain::model::{ContributorDescriptor, MatchingRule};
    use crate::domain::probability::{MATCH, NO_MATCH};
    use rust_decimal::Decimal;

    const ALWAYS_MATCH: &str = "AlwaysMatch";
    const ALWAYS_NO_MATCH: &str = "AlwaysNoMatch";
    const ADD_HALF: &str = "AddHalf";
    const NEVER_REGISTERED: &str = "NeverRegistered";

    struct AlwaysMatch;
    struct AlwaysNoMatch;
    struct AddHalf;
    struct NeverRegistered;

    fn descriptor(type_id: &str) -> ContributorDescriptor {
        ContributorDescriptor {
            type_id: type_id.to_string(),
            description: "test contributor".to_string(),
            parameters: vec![],
        }
    }

    impl RuleContributor for AlwaysMatch {
        fn descriptor(&self) -> ContributorDescriptor {
            descriptor(ALWAYS_MATCH)
        }

        fn apply(
            &self,
            rule: &MatchingRule,
            _first: &Person,
            _second: &Person,
            mut probability: ProbabilitySameIdentity,
            _next: Next<'_>,
        ) -> Result<ProbabilitySameIdentity> {
            probability.set_match(rule);
            Ok(probability)
        }
    }

    impl RuleContributor for AlwaysNoMatch {
        fn descriptor(&self) -> ContributorDescriptor {
            descriptor(ALWAYS_NO_MATCH)
        }

        fn apply(
            &self,
            rule: &MatchingRule,
            _first: &Person,
            _second: &Person,
            mut probability: ProbabilitySameIdentity,
            _next: Next<'_>,
        ) -> Result<ProbabilitySameIdentity> {
            probability.set_no_match(rule);
            Ok(probability)
        }
    }

    impl RuleContributor for AddHalf {
        fn descriptor(&self) -> ContributorDescriptor {
            descriptor(ADD_HALF)
        }

        fn apply(
            &self,
            rule: &MatchingRule,
            _first: &Person,
            _second: &Person,
            mut probability: ProbabilitySameIdentity,
            next: Next<'_>,
        ) -> Result<ProbabilitySameIdentity> {
            probability.add_contribution(rule, Decimal::new(5, 1));
            next.run(probability)
        }
    }

    impl RuleContributor for NeverRegistered {
        fn descriptor(&self) -> ContributorDescriptor {
            descriptor(NEVER_REGISTERED)
        }

        fn apply(
            &self,
            _rule: &MatchingRule,
            _first: &Person,
            _second: &Person,
            probability: ProbabilitySameIdentity,
            next: Next<'_>,
        ) -> Result<ProbabilitySameIdentity> {
            next.run(probability)
        }
    }

    fn registry() -> RuleRegistry {
        RuleRegistry::new()
            .with_contributor(Arc::new(AlwaysMatch))
            .with_contributor(Arc::new(AlwaysNoMatch))
            .with_contributor(Arc::new(AddHalf))
    }

    /// Registry used only to build rules, so a type can be valid at
    /// construction and missing at execution.
    fn construction_registry() -> RuleRegistry {
        registry().with_contributor(Arc::new(NeverRegistered))
    }

    fn rule(rule_type: &str, enabled: bool) -> MatchingRule {
        MatchingRule::new(
            &construction_registry(),
            rule_type,
            rule_type,
            "description",
            enabled,
            vec![],
        )
        .unwrap()
    }

    fn strategy(rules: Vec<MatchingRule>) -> MatchingStrategy {
        MatchingStrategy::new("Demo strategy", "description", rules).unwrap()
    }

    fn people() -> (Person, Person) {
        (
            Person::create("Andrew", "Doe", None, None).unwrap(),
            Person::create("Andy", "McAfee", None, None).unwrap(),
        )
    }

    fn executor() -> StrategyExecutor {
        StrategyExecutor::new(Arc::new(registry()))
    }

    #[test]
    fn test_executes_the_strategy() {
        let (first, second) = people();
        let result = executor()
            .compute_probability(&strategy(vec![rule(ALWAYS_MATCH, true)]), &first, &second)
            .unwrap();

        assert_eq!(result.probability(), MATCH);
        assert_eq!(result.contributors().len(), 1);
    }

    #[test]
    fn test_rules_run_in_declared_order() {
        let (first, second) = people();
        let strategy = strategy(vec![rule(ALWAYS_MATCH, true), rule(ALWAYS_NO_MATCH, true)]);

        let result = executor().compute_probability(&strategy, &first, &second).unwrap();

        assert_eq!(result.probability(), MATCH);
        assert_eq!(result.contributors().len(), 1);
        assert_eq!(result.contributors()[0].rule_type, ALWAYS_MATCH);
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let (first, second) = people();
        let strategy = strategy(vec![rule(ALWAYS_MATCH, false), rule(ALWAYS_NO_MATCH, true)]);

        let result = executor().compute_probability(&strategy, &first, &second).unwrap();

        assert_eq!(result.probability(), NO_MATCH);
        assert_eq!(result.contributors().len(), 1);
        assert!(result.contributors().iter().all(|c| c.rule_type != ALWAYS_MATCH));
    }

    #[test]
    fn test_all_disabled_rules_leave_probability_untouched() {
        let (first, second) = people();
        let strategy = strategy(vec![rule(ALWAYS_MATCH, false), rule(ADD_HALF, false)]);

        let result = executor().compute_probability(&strategy, &first, &second).unwrap();

        assert_eq!(result.probability(), NO_MATCH);
        assert!(result.contributors().is_empty());
    }

    #[test]
    fn test_unregistered_rule_aborts() {
        let (first, second) = people();
        let strategy = strategy(vec![rule(ADD_HALF, true), rule(NEVER_REGISTERED, true)]);

        let err = executor().compute_probability(&strategy, &first, &second).unwrap_err();

        match err {
            MatchError::RuleNotRegistered { rule_type } => assert_eq!(rule_type, NEVER_REGISTERED),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unregistered_but_disabled_rule_is_ignored() {
        let (first, second) = people();
        let strategy = strategy(vec![rule(NEVER_REGISTERED, false), rule(ADD_HALF, true)]);

        let result = executor().compute_probability(&strategy, &first, &second).unwrap();
        assert_eq!(result.probability(), Decimal::new(5, 1));
    }

    #[test]
    fn test_stops_once_probability_reaches_one() {
        let (first, second) = people();
        let strategy = strategy(vec![
            rule(ADD_HALF, true),
            rule(ADD_HALF, true),
            rule(ADD_HALF, true),
        ]);

        let result = executor().compute_probability(&strategy, &first, &second).unwrap();

        assert_eq!(result.probability(), MATCH);
        assert_eq!(result.contributors().len(), 2);
    }

    #[test]
    fn test_same_person_short_circuits() {
        let (first, _) = people();
        let strategy = strategy(vec![rule(ALWAYS_NO_MATCH, true), rule(NEVER_REGISTERED, true)]);

        let result = executor().compute_probability(&strategy, &first, &first.clone()).unwrap();

        assert_eq!(result.probability(), MATCH);
        assert!(result.contributors().is_empty());
    }
}
