use crate::app::rules::{
    BirthDateEquals, FirstNameMatching, IdentificationNumberEquals, LastNameEquals,
};
use crate::core::pipeline::RuleContributor;
use crate::domain::model::ContributorDescriptor;
use crate::domain::ports::ContributorRegistry;
use crate::utils::error::{MatchError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// String-keyed table of contributors, filled once at startup.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    contributors: BTreeMap<String, Arc<dyn RuleContributor>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four built-in contributors.
    pub fn with_defaults() -> Self {
        Self::new()
            .with_contributor(Arc::new(IdentificationNumberEquals))
            .with_contributor(Arc::new(LastNameEquals))
            .with_contributor(Arc::new(FirstNameMatching))
            .with_contributor(Arc::new(BirthDateEquals))
    }

    /// Binds a contributor under its own type identifier, replacing any previous binding.
    pub fn with_contributor(mut self, contributor: Arc<dyn RuleContributor>) -> Self {
        self.register(contributor);
        self
    }

    pub fn register(&mut self, contributor: Arc<dyn RuleContributor>) {
        let type_id = contributor.descriptor().type_id;
        if self.contributors.insert(type_id.clone(), contributor).is_some() {
            tracing::warn!(
                rule_type = %type_id,
                "rule contributor registered twice, keeping the last one"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }
}

impl ContributorRegistry for RuleRegistry {
    fn resolve(&self, rule_type: &str) -> Result<Arc<dyn RuleContributor>> {
        self.contributors
            .get(rule_type)
            .cloned()
            .ok_or_else(|| MatchError::RuleNotRegistered {
                rule_type: rule_type.to_string(),
            })
    }

    fn list_all(&self) -> Vec<ContributorDescriptor> {
        self.contributors.values().map(|c| c.descriptor()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rules::{
        BIRTH_DATE_EQUALS, FIRST_NAME_MATCHING, IDENTIFICATION_NUMBER_EQUALS, LAST_NAME_EQUALS,
    };

    #[test]
    fn test_defaults_are_registered() {
        let registry = RuleRegistry::with_defaults();
        assert_eq!(registry.len(), 4);
        for rule_type in [
            IDENTIFICATION_NUMBER_EQUALS,
            LAST_NAME_EQUALS,
            FIRST_NAME_MATCHING,
            BIRTH_DATE_EQUALS,
        ] {
            assert!(registry.resolve(rule_type).is_ok(), "{rule_type}");
        }
    }

    #[test]
    fn test_unknown_type_is_not_registered() {
        let registry = RuleRegistry::with_defaults();
        assert!(matches!(
            registry.resolve("Unknown"),
            Err(MatchError::RuleNotRegistered { .. })
        ));
        assert!(registry.describe("Unknown").is_none());
    }

    #[test]
    fn test_list_all_exposes_parameters() {
        let descriptors = RuleRegistry::with_defaults().list_all();
        assert_eq!(descriptors.len(), 4);

        let first_name = descriptors
            .iter()
            .find(|d| d.type_id == FIRST_NAME_MATCHING)
            .unwrap();
        let names: Vec<&str> = first_name.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["IncreaseWhenEqualsFirstNames", "IncreaseWhenSimilarFirstNames"]
        );

        let id_number = descriptors
            .iter()
            .find(|d| d.type_id == IDENTIFICATION_NUMBER_EQUALS)
            .unwrap();
        assert!(id_number.parameters.is_empty());
    }

    #[test]
    fn test_empty_registry() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list_all().is_empty());
    }
}
