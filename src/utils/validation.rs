use crate::utils::error::{MatchError, Result};
use std::collections::HashSet;
use std::fmt::Display;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Trims `value` and rejects it when nothing is left.
pub fn require_trimmed(field_name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MatchError::validation(format!(
            "{} cannot be null or empty.",
            field_name
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    require_trimmed(field_name, value).map(|_| ())
}

pub fn validate_non_empty_list<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(MatchError::validation(format!(
            "{} cannot be null or empty.",
            field_name
        )));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MatchError::validation(format!(
            "{} must be between {} and {} (got {})",
            field_name, min, max, value
        )));
    }
    Ok(())
}

/// Returns the first name that appears more than once.
pub fn find_duplicate<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}
