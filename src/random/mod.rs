//! Random test-data synthesis.
//!
//! Pure, stateless generators for staging plausible request data: names,
//! emails, identifiers, dates. Every function draws from the thread-local
//! RNG and returns a fresh value per call; nothing here touches the store.

pub mod identities;

use chrono::NaiveDate;
use rand::Rng;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

pub use identities::{
    generate_identity, generate_linked_account, generate_org_info, generate_user_info, Identity,
    LinkedAccount, OrgInfo, UserInfo,
};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Claude", "Donald", "Edsger", "Frances", "Grace", "John", "Katherine",
    "Ken", "Leslie", "Margaret", "Niklaus", "Radia",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Liskov", "Shannon", "Knuth", "Dijkstra", "Allen", "Hopper", "Backus",
    "Johnson", "Thompson", "Lamport", "Hamilton", "Wirth", "Perlman",
];

pub(crate) const JOB_TITLES: &[&str] = &[
    "Accounting", "Consulting", "Engineering", "Logistics", "Marketing", "Research", "Security",
    "Support",
];

/// Errors raised by random selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandomError {
    /// A random element was requested from a value that is not a sequence.
    NotASequence,
}

impl fmt::Display for RandomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandomError::NotASequence => {
                write!(f, "Cannot pick a random element from a non-sequence value")
            }
        }
    }
}

impl std::error::Error for RandomError {}

/// Picks a uniformly random element of a slice, `None` if it is empty.
pub fn one_of<T>(items: &[T]) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    let index = rand::thread_rng().gen_range(0..items.len());
    Some(&items[index])
}

/// Picks a uniformly random element of a JSON sequence.
///
/// An empty sequence yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`RandomError::NotASequence`] for any non-sequence value; that is
/// a caller bug and is raised immediately rather than papered over.
pub fn one_of_value(value: &Value) -> Result<Option<&Value>, RandomError> {
    match value {
        Value::Array(items) => Ok(one_of(items)),
        _ => Err(RandomError::NotASequence),
    }
}

/// Generates a new UUID v4 string.
pub fn generate_guid() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a random number with exactly the given number of digits.
///
/// `digits` must be at least 1 and at most 18 (to stay within `u64`).
pub fn generate_number_by_digits(digits: u32) -> u64 {
    let digits = digits.clamp(1, 18);
    let min = 10u64.pow(digits - 1);
    let max = 10u64.pow(digits);
    rand::thread_rng().gen_range(min..max)
}

/// Generates a random first name.
pub fn generate_first_name() -> String {
    one_of(FIRST_NAMES).map(|s| s.to_string()).unwrap_or_default()
}

/// Generates a random last name.
pub fn generate_last_name() -> String {
    one_of(LAST_NAMES).map(|s| s.to_string()).unwrap_or_default()
}

/// Joins a first and last name, generating both when either is missing.
pub fn generate_full_name(first_name: Option<&str>, last_name: Option<&str>) -> String {
    match (first_name, last_name) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        _ => format!("{} {}", generate_first_name(), generate_last_name()),
    }
}

/// Generates an email address, deriving missing name parts randomly.
pub fn generate_email(first_name: Option<&str>, last_name: Option<&str>) -> String {
    let first = first_name
        .map(str::to_string)
        .unwrap_or_else(generate_first_name);
    let last = last_name
        .map(str::to_string)
        .unwrap_or_else(generate_last_name);
    format!("{}.{}@example.com", first, last)
}

/// Generates a 9-digit taxpayer identification number.
pub fn generate_tin() -> u64 {
    generate_number_by_digits(9)
}

/// Generates a US-formatted phone number.
pub fn generate_phone_number() -> String {
    format!("+1610{}", generate_number_by_digits(7))
}

/// Generates a birth date in the 1990s as `YYYY-MM-DD`.
pub fn generate_birth_date() -> String {
    let mut rng = rand::thread_rng();
    let year = 1990 + rng.gen_range(0..10);
    let month = rng.gen_range(1..=12);
    // Capped at 28 so every month is valid
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}-{:02}", year, month, day))
}
