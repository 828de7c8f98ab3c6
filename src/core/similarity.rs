//! String heuristics used by the name rules.

/// Levenshtein distance with unit costs, counted in chars.
pub fn edit_distance(first: &str, second: &str) -> usize {
    strsim::levenshtein(first, second)
}

/// True when one name is the other's initial followed by a period, e.g. `A.` and `Andrew`.
pub fn have_same_initials(first: &str, second: &str) -> bool {
    is_initial_of(first, second) || is_initial_of(second, first)
}

fn is_initial_of(name: &str, abbreviation: &str) -> bool {
    let Some(initial) = name.chars().next() else {
        return false;
    };
    let mut abbreviated = abbreviation.chars();
    matches!(
        (abbreviated.next(), abbreviated.next()),
        (Some(c), Some('.')) if c == initial
    )
}

pub fn are_names_similar(first: &str, second: &str) -> bool {
    have_same_initials(first, second) || edit_distance(first, second) <= 3
}
