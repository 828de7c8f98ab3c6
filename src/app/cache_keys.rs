use uuid::Uuid;

const CALCULATE_PROBABILITY_SAME_IDENTITY: &str = "CalculateProbabilitySameIdentity";

/// Key of the cached contributor descriptors. Never expires.
pub const AVAILABLE_RULES: &str = "AvailableRules";

/// `CalculateProbabilitySameIdentity.<lower id>.<higher id>.<strategy id>`.
///
/// The pair is ordered by the ids' string forms, so swapping the persons
/// yields the same key.
pub fn probability_same_identity(first: Uuid, second: Uuid, strategy: Uuid) -> String {
    let (first, second) = (first.to_string(), second.to_string());
    let (low, high) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };
    format!("{CALCULATE_PROBABILITY_SAME_IDENTITY}.{low}.{high}.{strategy}")
}

/// True when `key` is a probability entry computed with `strategy`.
pub fn references_strategy(key: &str, strategy: Uuid) -> bool {
    key.starts_with(CALCULATE_PROBABILITY_SAME_IDENTITY) && key.ends_with(&strategy.to_string())
}
