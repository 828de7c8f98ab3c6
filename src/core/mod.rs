// Core layer: similarity primitives, the rule chain and the strategy executor.

pub mod executor;
pub mod pipeline;
pub mod similarity;

pub use executor::StrategyExecutor;
pub use pipeline::{Next, RuleContributor};
