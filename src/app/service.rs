use crate::adapters::{InMemoryPersonStore, InMemoryStrategyStore, MemoryCache};
use crate::app::cache_keys;
use crate::app::registry::RuleRegistry;
use crate::app::rules::{
    BIRTH_DATE_EQUALS, FIRST_NAME_MATCHING, IDENTIFICATION_NUMBER_EQUALS, LAST_NAME_EQUALS,
};
use crate::core::executor::StrategyExecutor;
use crate::domain::model::{
    ContributorDescriptor, MatchingRule, MatchingStrategy, NewPerson, Person, StrategyDefinition,
    StrategySummary,
};
use crate::domain::ports::{
    ContributorRegistry, MatchCache, PersonLookup, PersonStore, StrategyLookup, StrategyStore,
};
use crate::domain::probability::{Contributor, ProbabilitySameIdentity};
use crate::utils::error::{MatchError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// What callers get back from a probability computation, and what gets cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub probability: Decimal,
    pub contributors: Vec<Contributor>,
    pub strategy: StrategySummary,
}

impl MatchOutcome {
    pub fn new(result: ProbabilitySameIdentity, strategy: StrategySummary) -> Self {
        Self {
            probability: result.probability(),
            contributors: result.into_contributors(),
            strategy,
        }
    }
}

/// Values the service keeps in its cache.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Outcome(MatchOutcome),
    AvailableRules(Vec<ContributorDescriptor>),
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub cache_enabled: bool,
    pub result_ttl: Duration,
    pub lookup_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            result_ttl: Duration::from_secs(10 * 60),
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

/// The four built-in rules in their usual order, with default parameters.
pub fn default_strategy(registry: &dyn ContributorRegistry) -> Result<MatchingStrategy> {
    let rule = |rule_type: &str, description: &str| {
        MatchingRule::new(registry, rule_type, rule_type, description, true, vec![])
    };

    MatchingStrategy::new(
        "Default",
        "The default strategy with the built-in rules",
        vec![
            rule(
                IDENTIFICATION_NUMBER_EQUALS,
                "Interrupts the pipeline and returns 100% if business identifiers are known and equal.",
            )?,
            rule(LAST_NAME_EQUALS, "Adds 40% if the last names match.")?,
            rule(
                FIRST_NAME_MATCHING,
                "Adds 20% if the first names match or 15% if they are similar.",
            )?,
            rule(
                BIRTH_DATE_EQUALS,
                "Adds 40% if birth dates match or interrupts the pipeline if both birth dates are known and different.",
            )?,
        ],
    )
}

/// Use cases around persons, strategies and identity matching.
pub struct MatchingService {
    persons: Arc<dyn PersonStore>,
    strategies: Arc<dyn StrategyStore>,
    executor: StrategyExecutor,
    cache: Arc<dyn MatchCache<CachedValue>>,
    settings: ServiceSettings,
}

impl MatchingService {
    pub fn new(
        persons: Arc<dyn PersonStore>,
        strategies: Arc<dyn StrategyStore>,
        registry: Arc<dyn ContributorRegistry>,
        cache: Arc<dyn MatchCache<CachedValue>>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            persons,
            strategies,
            executor: StrategyExecutor::new(registry),
            cache,
            settings,
        }
    }

    /// Everything in memory with the built-in rules.
    pub fn in_memory(settings: ServiceSettings) -> Self {
        Self::new(
            Arc::new(InMemoryPersonStore::new()),
            Arc::new(InMemoryStrategyStore::new()),
            Arc::new(RuleRegistry::with_defaults()),
            Arc::new(MemoryCache::new()),
            settings,
        )
    }

    pub fn registry(&self) -> &Arc<dyn ContributorRegistry> {
        self.executor.registry()
    }

    async fn bounded<T, F>(&self, what: &str, lookup: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.settings.lookup_timeout, lookup)
            .await
            .map_err(|_| MatchError::LookupTimeout {
                what: what.to_string(),
                timeout_ms: self.settings.lookup_timeout.as_millis() as u64,
            })?
    }

    pub async fn person(&self, id: Uuid) -> Result<Person> {
        self.bounded("person", self.persons.get_by_id(id))
            .await?
            .ok_or_else(|| MatchError::PersonNotFound { id: id.to_string() })
    }

    pub async fn strategy(&self, id: Uuid) -> Result<MatchingStrategy> {
        self.bounded("strategy", self.strategies.get_by_id(id))
            .await?
            .ok_or_else(|| MatchError::StrategyNotFound {
                reference: id.to_string(),
            })
    }

    pub async fn strategy_by_name(&self, name: &str) -> Result<MatchingStrategy> {
        self.bounded("strategy", self.strategies.get_by_name(name))
            .await?
            .ok_or_else(|| MatchError::StrategyNotFound {
                reference: name.to_string(),
            })
    }

    pub async fn strategies(&self) -> Result<Vec<MatchingStrategy>> {
        self.bounded("strategies", self.strategies.all()).await
    }

    pub async fn calculate_probability(
        &self,
        first_id: Uuid,
        second_id: Uuid,
        strategy_id: Uuid,
    ) -> Result<MatchOutcome> {
        let key = cache_keys::probability_same_identity(first_id, second_id, strategy_id);
        if let Some(outcome) = self.cached_outcome(&key) {
            return Ok(outcome);
        }

        let strategy = self.strategy(strategy_id).await?;
        self.compute_and_cache(key, &strategy, first_id, second_id).await
    }

    pub async fn calculate_probability_by_strategy_name(
        &self,
        first_id: Uuid,
        second_id: Uuid,
        strategy_name: &str,
    ) -> Result<MatchOutcome> {
        let strategy = self.strategy_by_name(strategy_name).await?;
        let key = cache_keys::probability_same_identity(first_id, second_id, strategy.id());
        if let Some(outcome) = self.cached_outcome(&key) {
            return Ok(outcome);
        }

        self.compute_and_cache(key, &strategy, first_id, second_id).await
    }

    fn cached_outcome(&self, key: &str) -> Option<MatchOutcome> {
        if !self.settings.cache_enabled {
            return None;
        }
        match self.cache.get(key) {
            Some(CachedValue::Outcome(outcome)) => {
                tracing::debug!(key, "probability served from cache");
                Some(outcome)
            }
            _ => None,
        }
    }

    async fn compute_and_cache(
        &self,
        key: String,
        strategy: &MatchingStrategy,
        first_id: Uuid,
        second_id: Uuid,
    ) -> Result<MatchOutcome> {
        let first = self.person(first_id).await?;
        let second = self.person(second_id).await?;

        let result = self.executor.compute_probability(strategy, &first, &second)?;
        let outcome = MatchOutcome::new(result, strategy.summary());

        tracing::info!(
            first = %first_id,
            second = %second_id,
            strategy = strategy.name(),
            probability = %outcome.probability,
            "probability same identity computed"
        );

        if self.settings.cache_enabled {
            self.cache.set(
                key,
                CachedValue::Outcome(outcome.clone()),
                Some(self.settings.result_ttl),
            );
        }

        Ok(outcome)
    }

    pub async fn create_person(&self, input: NewPerson) -> Result<Uuid> {
        let person = input.into_person()?;
        let id = person.id();
        self.bounded("person", self.persons.create(person)).await?;
        tracing::info!(person = %id, "person created");
        Ok(id)
    }

    pub async fn people(&self) -> Result<Vec<Person>> {
        self.bounded("people", self.persons.all()).await
    }

    pub async fn create_strategy(&self, definition: &StrategyDefinition) -> Result<Uuid> {
        let strategy = definition.build(self.registry().as_ref())?;
        let id = strategy.id();
        self.bounded("strategy", self.strategies.create(strategy)).await?;
        tracing::info!(strategy = %id, name = %definition.name, "strategy created");
        Ok(id)
    }

    /// Registers configured strategies, or the built-in `Default` one when
    /// nothing is configured.
    pub async fn register_strategies(
        &self,
        definitions: &[StrategyDefinition],
    ) -> Result<Vec<Uuid>> {
        if definitions.is_empty() {
            let strategy = default_strategy(self.registry().as_ref())?;
            let id = strategy.id();
            self.bounded("strategy", self.strategies.create(strategy)).await?;
            tracing::info!(strategy = %id, "no strategies configured, using the default one");
            return Ok(vec![id]);
        }

        let mut ids = Vec::with_capacity(definitions.len());
        for definition in definitions {
            ids.push(self.create_strategy(definition).await?);
        }
        Ok(ids)
    }

    pub async fn update_strategy(&self, id: Uuid, definition: &StrategyDefinition) -> Result<()> {
        let mut strategy = self.strategy(id).await?;
        let rules = definition.build_rules(self.registry().as_ref())?;
        strategy.update(&definition.name, &definition.description, rules)?;

        self.bounded("strategy", self.strategies.update(strategy)).await?;
        self.invalidate_strategy(id);
        tracing::info!(strategy = %id, "strategy updated");
        Ok(())
    }

    /// Returns false when there was nothing to delete.
    pub async fn delete_strategy(&self, id: Uuid) -> Result<bool> {
        let deleted = self.bounded("strategy", self.strategies.delete(id)).await?;
        if deleted {
            self.invalidate_strategy(id);
            tracing::info!(strategy = %id, "strategy deleted");
        }
        Ok(deleted)
    }

    /// Drops cached results of `strategy`. A reader racing with the store
    /// write may still get the old value once.
    fn invalidate_strategy(&self, strategy: Uuid) {
        let removed = self
            .cache
            .remove_where(&|key: &str| cache_keys::references_strategy(key, strategy));
        if removed > 0 {
            tracing::warn!(strategy = %strategy, removed, "cached probabilities invalidated");
        }
    }

    /// Contributors the registry knows about, cached until restart.
    pub fn available_rules(&self) -> Vec<ContributorDescriptor> {
        if let Some(CachedValue::AvailableRules(rules)) =
            self.cache.get(cache_keys::AVAILABLE_RULES)
        {
            return rules;
        }

        let rules = self.registry().list_all();
        self.cache.set(
            cache_keys::AVAILABLE_RULES.to_string(),
            CachedValue::AvailableRules(rules.clone()),
            None,
        );
        rules
    }
}
