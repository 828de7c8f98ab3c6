use crate::app::service::ServiceSettings;
use crate::domain::model::StrategyDefinition;
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{find_duplicate, validate_non_empty_string, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_RESULT_TTL_SECONDS: u64 = 600;
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub strategies: Vec<StrategyDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "identity-match".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_result_ttl_seconds")]
    pub result_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            result_ttl_seconds: DEFAULT_RESULT_TTL_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_lookup_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_result_ttl_seconds() -> u64 {
    DEFAULT_RESULT_TTL_SECONDS
}

fn default_lookup_timeout_ms() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_MS
}

impl MatcherConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MatchError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MatchError::ConfigError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("service.name", &self.service.name)?;
        validate_range("cache.result_ttl_seconds", self.cache.result_ttl_seconds, 1, 86_400)?;
        validate_range("lookup.timeout_ms", self.lookup.timeout_ms, 1, 600_000)?;

        for (index, strategy) in self.strategies.iter().enumerate() {
            validate_non_empty_string(&format!("strategies[{}].name", index), &strategy.name)?;
            if strategy.rules.is_empty() {
                return Err(MatchError::ConfigError {
                    field: format!("strategies[{}].rules", index),
                    message: format!("strategy '{}' declares no rules", strategy.name),
                });
            }
        }

        if let Some(name) = find_duplicate(self.strategies.iter().map(|s| s.name.trim())) {
            return Err(MatchError::ConfigError {
                field: "strategies".to_string(),
                message: format!("strategy '{}' is declared more than once", name),
            });
        }

        Ok(())
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            cache_enabled: self.cache.enabled,
            result_ttl: Duration::from_secs(self.cache.result_ttl_seconds),
            lookup_timeout: Duration::from_millis(self.lookup.timeout_ms),
        }
    }
}

impl Validate for MatcherConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
