use crate::domain::ports::ContributorRegistry;
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{find_duplicate, require_trimmed, validate_non_empty_list};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person record, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    id: Uuid,
    first_name: String,
    last_name: String,
    birth_date: Option<NaiveDate>,
    identification_number: Option<String>,
}

impl Person {
    /// Validates the input and assigns a fresh id. The time part of the
    /// birth date is discarded.
    pub fn create(
        first_name: &str,
        last_name: &str,
        birth_date: Option<NaiveDateTime>,
        identification_number: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            first_name: require_trimmed("first_name", first_name)?,
            last_name: require_trimmed("last_name", last_name)?,
            birth_date: birth_date.map(|dt| dt.date()),
            identification_number: identification_number
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn identification_number(&self) -> Option<&str> {
        self.identification_number.as_deref()
    }
}

/// Input used to create a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub identification_number: Option<String>,
}

impl NewPerson {
    pub fn into_person(self) -> Result<Person> {
        Person::create(
            &self.first_name,
            &self.last_name,
            self.birth_date,
            self.identification_number.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleParameter {
    pub name: String,
    pub value: Decimal,
}

impl RuleParameter {
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A parameter a contributor accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub description: String,
}

/// What a contributor is and which parameters it understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorDescriptor {
    pub type_id: String,
    pub description: String,
    pub parameters: Vec<ParameterDescriptor>,
}

impl ContributorDescriptor {
    pub fn declares(&self, parameter_name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == parameter_name)
    }
}

/// One step of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchingRule {
    name: String,
    description: String,
    enabled: bool,
    rule_type: String,
    parameters: Vec<RuleParameter>,
}

impl MatchingRule {
    /// Creates a rule, checking the rule type and its parameters against the registry.
    pub fn new(
        registry: &dyn ContributorRegistry,
        rule_type: &str,
        name: &str,
        description: &str,
        enabled: bool,
        parameters: Vec<RuleParameter>,
    ) -> Result<Self> {
        let rule_type = require_trimmed("rule_type", rule_type)?;
        let name = require_trimmed("name", name)?;
        let description = require_trimmed("description", description)?;

        let descriptor = registry
            .describe(&rule_type)
            .ok_or_else(|| MatchError::InvalidRuleType {
                rule_type: rule_type.clone(),
            })?;

        if find_duplicate(parameters.iter().map(|p| p.name.as_str())).is_some() {
            return Err(MatchError::DuplicatedParameters { rule_type });
        }

        if let Some(unknown) = parameters.iter().find(|p| !descriptor.declares(&p.name)) {
            return Err(MatchError::InvalidParameter {
                parameter: unknown.name.clone(),
                rule_type,
            });
        }

        Ok(Self {
            name,
            description,
            enabled,
            rule_type,
            parameters,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn rule_type(&self) -> &str {
        &self.rule_type
    }

    pub fn parameters(&self) -> &[RuleParameter] {
        &self.parameters
    }

    /// Value of the named parameter, or `default` when the rule does not set it.
    pub fn parameter_or(&self, name: &str, default: Decimal) -> Decimal {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
            .unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchingStrategy {
    id: Uuid,
    name: String,
    description: String,
    rules: Vec<MatchingRule>,
}

impl MatchingStrategy {
    pub fn new(name: &str, description: &str, rules: Vec<MatchingRule>) -> Result<Self> {
        let (name, description) = Self::validated(name, description, &rules)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            rules,
        })
    }

    /// Replaces name, description and rules together. Nothing changes on error.
    pub fn update(
        &mut self,
        name: &str,
        description: &str,
        rules: Vec<MatchingRule>,
    ) -> Result<()> {
        let (name, description) = Self::validated(name, description, &rules)?;
        self.name = name;
        self.description = description;
        self.rules = rules;
        Ok(())
    }

    fn validated(
        name: &str,
        description: &str,
        rules: &[MatchingRule],
    ) -> Result<(String, String)> {
        let name = require_trimmed("name", name)?;
        let description = require_trimmed("description", description)?;
        validate_non_empty_list("rules", rules)?;
        Ok((name, description))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rules(&self) -> &[MatchingRule] {
        &self.rules
    }

    pub fn summary(&self) -> StrategySummary {
        StrategySummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

/// Unvalidated rule input, as read from config or a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub rule_type: String,
    pub name: String,
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub parameters: std::collections::BTreeMap<String, Decimal>,
}

fn default_enabled() -> bool {
    true
}

impl RuleDefinition {
    pub fn build(&self, registry: &dyn ContributorRegistry) -> Result<MatchingRule> {
        let parameters = self
            .parameters
            .iter()
            .map(|(name, value)| RuleParameter::new(name.clone(), *value))
            .collect();
        MatchingRule::new(
            registry,
            &self.rule_type,
            &self.name,
            &self.description,
            self.enabled,
            parameters,
        )
    }
}

/// Unvalidated strategy input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl StrategyDefinition {
    pub fn build_rules(&self, registry: &dyn ContributorRegistry) -> Result<Vec<MatchingRule>> {
        self.rules.iter().map(|r| r.build(registry)).collect()
    }

    pub fn build(&self, registry: &dyn ContributorRegistry) -> Result<MatchingStrategy> {
        MatchingStrategy::new(&self.name, &self.description, self.build_rules(registry)?)
    }
}
