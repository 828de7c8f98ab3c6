use crate::app::rules::IDENTIFICATION_NUMBER_EQUALS;
use crate::core::pipeline::{Next, RuleContributor};
use crate::domain::model::{ContributorDescriptor, MatchingRule, Person};
use crate::domain::probability::ProbabilitySameIdentity;
use crate::utils::error::Result;

/// Ends the pipeline with a match when both identification numbers are known and equal.
pub struct IdentificationNumberEquals;

impl RuleContributor for IdentificationNumberEquals {
    fn descriptor(&self) -> ContributorDescriptor {
        ContributorDescriptor {
            type_id: IDENTIFICATION_NUMBER_EQUALS.to_string(),
            description: "Interrupts the pipeline and returns 100% if business identifiers are known and equal."
                .to_string(),
            parameters: vec![],
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
        match (first.identification_number(), second.identification_number()) {
            (Some(a), Some(b)) if !a.is_empty() && a == b => {
                tracing::debug!(
                    first = a,
                    second = b,
                    "identification numbers match, returning match"
                );
                probability.set_match(rule);
                Ok(probability)
            }
            _ => next.run(probability),
        }
    }
}
