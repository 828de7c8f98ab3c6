use crate::app::rules::FIRST_NAME_MATCHING;
use crate::core::pipeline::{Next, RuleContributor};
use crate::core::similarity::are_names_similar;
use crate::domain::model::{ContributorDescriptor, MatchingRule, ParameterDescriptor, Person};
use crate::domain::probability::ProbabilitySameIdentity;
use crate::utils::error::Result;
use rust_decimal::Decimal;

/// Adds 20% for equal first names, 15% for similar ones (initials or a few typos).
pub struct FirstNameMatching;

impl FirstNameMatching {
    pub const INCREASE_WHEN_EQUALS_FIRST_NAMES: &'static str = "IncreaseWhenEqualsFirstNames";
    pub const INCREASE_WHEN_SIMILAR_FIRST_NAMES: &'static str = "IncreaseWhenSimilarFirstNames";
}

impl RuleContributor for FirstNameMatching {
    fn descriptor(&self) -> ContributorDescriptor {
        ContributorDescriptor {
            type_id: FIRST_NAME_MATCHING.to_string(),
            description: "Adds 20% if the first names match or 15% if they are similar."
                .to_string(),
            parameters: vec![
                ParameterDescriptor {
                    name: Self::INCREASE_WHEN_EQUALS_FIRST_NAMES.to_string(),
                    description: "The probability to add for a first name exact match.".to_string(),
                },
                ParameterDescriptor {
                    name: Self::INCREASE_WHEN_SIMILAR_FIRST_NAMES.to_string(),
                    description: "The probability to add for a first name similarity match."
                        .to_string(),
                },
            ],
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
        let (a, b) = (first.first_name(), second.first_name());

        if a == b {
            let increase =
                rule.parameter_or(Self::INCREASE_WHEN_EQUALS_FIRST_NAMES, Decimal::new(2, 1));
            tracing::debug!(first = a, second = b, %increase, "first names match");
            probability.add_contribution(rule, increase);
        } else if are_names_similar(a, b) {
            let increase =
                rule.parameter_or(Self::INCREASE_WHEN_SIMILAR_FIRST_NAMES, Decimal::new(15, 2));
            tracing::debug!(first = a, second = b, %increase, "first names similar");
            probability.add_contribution(rule, increase);
        }

        next.run(probability)
    }
}
