use crate::domain::model::{MatchingStrategy, Person};
use crate::domain::ports::{PersonLookup, PersonStore, StrategyLookup, StrategyStore};
use crate::utils::error::{MatchError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryPersonStore {
    people: RwLock<HashMap<Uuid, Person>>,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonLookup for InMemoryPersonStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Person>> {
        Ok(self.people.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl PersonStore for InMemoryPersonStore {
    async fn create(&self, person: Person) -> Result<()> {
        self.people.write().await.insert(person.id(), person);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Person>> {
        let mut people: Vec<Person> = self.people.read().await.values().cloned().collect();
        people.sort_by(|a, b| {
            (a.last_name(), a.first_name()).cmp(&(b.last_name(), b.first_name()))
        });
        Ok(people)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStrategyStore {
    strategies: RwLock<HashMap<Uuid, MatchingStrategy>>,
}

impl InMemoryStrategyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn name_taken(strategies: &HashMap<Uuid, MatchingStrategy>, name: &str, except: Uuid) -> bool {
        strategies
            .values()
            .any(|s| s.id() != except && s.name() == name)
    }
}

#[async_trait]
impl StrategyLookup for InMemoryStrategyStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<MatchingStrategy>> {
        Ok(self.strategies.read().await.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<MatchingStrategy>> {
        Ok(self
            .strategies
            .read()
            .await
            .values()
            .find(|s| s.name() == name)
            .cloned())
    }
}

#[async_trait]
impl StrategyStore for InMemoryStrategyStore {
    async fn create(&self, strategy: MatchingStrategy) -> Result<()> {
        let mut strategies = self.strategies.write().await;
        if Self::name_taken(&strategies, strategy.name(), strategy.id()) {
            return Err(MatchError::StrategyAlreadyExists {
                name: strategy.name().to_string(),
            });
        }
        strategies.insert(strategy.id(), strategy);
        Ok(())
    }

    async fn update(&self, strategy: MatchingStrategy) -> Result<()> {
        let mut strategies = self.strategies.write().await;
        if !strategies.contains_key(&strategy.id()) {
            return Err(MatchError::StrategyNotFound {
                reference: strategy.id().to_string(),
            });
        }
        if Self::name_taken(&strategies, strategy.name(), strategy.id()) {
            return Err(MatchError::StrategyAlreadyExists {
                name: strategy.name().to_string(),
            });
        }
        strategies.insert(strategy.id(), strategy);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.strategies.write().await.remove(&id).is_some())
    }

    async fn all(&self) -> Result<Vec<MatchingStrategy>> {
        let mut strategies: Vec<MatchingStrategy> =
            self.strategies.read().await.values().cloned().collect();
        strategies.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(strategies)
    }
}
