use crate::app::rules::BIRTH_DATE_EQUALS;
use crate::core::pipeline::{Next, RuleContributor};
use crate::domain::model::{ContributorDescriptor, MatchingRule, ParameterDescriptor, Person};
use crate::domain::probability::ProbabilitySameIdentity;
use crate::utils::error::Result;
use rust_decimal::Decimal;

/// Adds 40% when both birth dates are known and equal; ends the pipeline
/// with no match when both are known and differ.
pub struct BirthDateEquals;

impl BirthDateEquals {
    pub const INCREASE_WHEN_BIRTH_DATE_MATCHES: &'static str = "IncreaseWhenBirthDateMatches";
}

impl RuleContributor for BirthDateEquals {
    fn descriptor(&self) -> ContributorDescriptor {
        ContributorDescriptor {
            type_id: BIRTH_DATE_EQUALS.to_string(),
            description: "Adds 40% if birth dates match or interrupts the pipeline if both birth dates are known and different."
                .to_string(),
            parameters: vec![ParameterDescriptor {
                name: Self::INCREASE_WHEN_BIRTH_DATE_MATCHES.to_string(),
                description: "The probability to add for a birth date match.".to_string(),
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
        match (first.birth_date(), second.birth_date()) {
            (Some(a), Some(b)) if a == b => {
                let increase =
                    rule.parameter_or(Self::INCREASE_WHEN_BIRTH_DATE_MATCHES, Decimal::new(4, 1));
                tracing::debug!(birth_date = %a, %increase, "birth dates match");
                probability.add_contribution(rule, increase);
                next.run(probability)
            }
            (Some(a), Some(b)) => {
                tracing::debug!(first = %a, second = %b, "birth dates differ, returning no match");
                probability.set_no_match(rule);
                Ok(probability)
            }
            _ => next.run(probability),
        }
    }
}
