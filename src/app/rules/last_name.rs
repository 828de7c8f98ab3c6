use crate::app::rules::LAST_NAME_EQUALS;
use crate::core::pipeline::{Next, RuleContributor};
use crate::domain::model::{ContributorDescriptor, MatchingRule, ParameterDescriptor, Person};
use crate::domain::probability::ProbabilitySameIdentity;
use crate::utils::error::Result;
use rust_decimal::Decimal;

/// Adds 40% (by default) when the last names are equal.
pub struct LastNameEquals;

impl LastNameEquals {
    pub const INCREASE_WHEN_EQUALS_LAST_NAMES: &'static str = "IncreaseWhenEqualsLastNames";

    fn default_increase() -> Decimal {
        Decimal::new(4, 1)
    }
}

impl RuleContributor for LastNameEquals {
    fn descriptor(&self) -> ContributorDescriptor {
        ContributorDescriptor {
            type_id: LAST_NAME_EQUALS.to_string(),
            description: "Adds 40% if the last names match.".to_string(),
            parameters: vec![ParameterDescriptor {
                name: Self::INCREASE_WHEN_EQUALS_LAST_NAMES.to_string(),
                description: "The probability to add for a last name exact match.".to_string(),
            }],
        }
    }

    fn apply(
        &self,
        rule: &MatchingRule,
        first: &Person,
        second: &Person,
        mut probability: ProbabilitySameIdentity,
        next: Next<'_>,
    ) -> Result<ProbabilitySameIdentity> {
        if first.last_name() == second.last_name() {
            let increase =
                rule.parameter_or(Self::INCREASE_WHEN_EQUALS_LAST_NAMES, Self::default_increase());
            tracing::debug!(
                first = first.last_name(),
                second = second.last_name(),
                %increase,
                "last names match"
            );
            probability.add_contribution(rule, increase);
        }

        next.run(probability)
    }
}
