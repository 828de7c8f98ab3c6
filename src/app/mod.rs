// Application layer: built-in rules, the registry and the matching use cases.

pub mod cache_keys;
pub mod registry;
pub mod rules;
pub mod service;

pub use registry::RuleRegistry;
pub use service::{default_strategy, CachedValue, MatchOutcome, MatchingService, ServiceSettings};
