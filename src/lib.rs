pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::MatcherConfig;

pub use adapters::{InMemoryPersonStore, InMemoryStrategyStore, MemoryCache};
pub use app::{default_strategy, MatchOutcome, MatchingService, RuleRegistry, ServiceSettings};
pub use core::executor::StrategyExecutor;
pub use domain::model::{
    MatchingRule, MatchingStrategy, NewPerson, Person, RuleDefinition, StrategyDefinition,
};
pub use domain::probability::{Contributor, ProbabilitySameIdentity};
pub use utils::error::{MatchError, Result};
