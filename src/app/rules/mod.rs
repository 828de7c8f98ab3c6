//! Built-in rule contributors.

mod birth_date;
mod first_name;
mod identification_number;
mod last_name;

pub use birth_date::BirthDateEquals;
pub use first_name::FirstNameMatching;
pub use identification_number::IdentificationNumberEquals;
pub use last_name::LastNameEquals;

pub const IDENTIFICATION_NUMBER_EQUALS: &str = "IdentificationNumberEquals";
pub const LAST_NAME_EQUALS: &str = "LastNameEquals";
pub const FIRST_NAME_MATCHING: &str = "FirstNameMatching";
pub const BIRTH_DATE_EQUALS: &str = "BirthDateEquals";
