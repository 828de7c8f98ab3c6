use crate::core::pipeline::RuleContributor;
use crate::domain::model::{ContributorDescriptor, MatchingStrategy, Person};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[async_trait]
pub trait PersonLookup: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Person>>;
}

#[async_trait]
pub trait PersonStore: PersonLookup {
    async fn create(&self, person: Person) -> Result<()>;
    async fn all(&self) -> Result<Vec<Person>>;
}

#[async_trait]
pub trait StrategyLookup: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<MatchingStrategy>>;
    async fn get_by_name(&self, name: &str) -> Result<Option<MatchingStrategy>>;
}

#[async_trait]
pub trait StrategyStore: StrategyLookup {
    /// Fails with `StrategyAlreadyExists` when the name is taken.
    async fn create(&self, strategy: MatchingStrategy) -> Result<()>;
    async fn update(&self, strategy: MatchingStrategy) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn all(&self) -> Result<Vec<MatchingStrategy>>;
}

/// Maps stable rule type identifiers to contributor implementations.
pub trait ContributorRegistry: Send + Sync {
    /// Fails with `RuleNotRegistered` when nothing is bound to `rule_type`.
    fn resolve(&self, rule_type: &str) -> Result<Arc<dyn RuleContributor>>;

    fn list_all(&self) -> Vec<ContributorDescriptor>;

    fn describe(&self, rule_type: &str) -> Option<ContributorDescriptor> {
        self.resolve(rule_type).ok().map(|c| c.descriptor())
    }
}

/// Process-local key/value cache with optional per-entry expiry.
pub trait MatchCache<V: Clone>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;
    fn set(&self, key: String, value: V, ttl: Option<Duration>);
    fn remove(&self, key: &str) -> bool;
    /// Drops every key the predicate accepts and returns how many went.
    fn remove_where(&self, predicate: &dyn Fn(&str) -> bool) -> usize;
}
