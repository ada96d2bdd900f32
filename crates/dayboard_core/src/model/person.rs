//! Person records and roster-entry validation helpers.
//!
//! # Responsibility
//! - Define the `Person` record and its opaque identifier.
//! - Provide name normalization, duplicate detection and name ordering.
//!
//! # Invariants
//! - `PersonId` is assigned once at creation and never reused.
//! - Stored names are trimmed and non-empty.

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_ID_PREFIX: &str = "person-";

thread_local! {
    static NAME_COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// Opaque person identifier.
///
/// Serialized as a bare string so ids written by older builds
/// (`person-<millis>`) keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Generates a fresh, never-reused identifier.
    pub fn generate() -> Self {
        Self(format!("{PERSON_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    /// Wraps an externally known identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named entity that lives in the master roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

impl Person {
    /// Creates a person with a generated id and a trimmed name.
    pub fn new(name: &str) -> Self {
        Self::with_id(PersonId::generate(), name)
    }

    /// Creates a person with a caller-provided id.
    pub fn with_id(id: PersonId, name: &str) -> Self {
        Self {
            id,
            name: normalize_name(name).to_string(),
        }
    }
}

/// Trims surrounding whitespace from raw user input.
pub fn normalize_name(raw: &str) -> &str {
    raw.trim()
}

/// Returns the roster entry whose name matches `name` case-insensitively.
///
/// `name` is normalized before comparison.
pub fn find_duplicate<'a>(roster: &'a [Person], name: &str) -> Option<&'a Person> {
    let needle = normalize_name(name).to_lowercase();
    roster
        .iter()
        .find(|person| person.name.to_lowercase() == needle)
}

/// Returns whether `name` collides case-insensitively with a roster entry.
pub fn is_duplicate(roster: &[Person], name: &str) -> bool {
    find_duplicate(roster, name).is_some()
}

/// Orders two names the way people lists are displayed.
///
/// Uses root-locale Unicode collation: accents and case only break ties
/// between otherwise equal names, and lowercase sorts first.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    NAME_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(left, right),
        None => left
            .to_lowercase()
            .cmp(&right.to_lowercase())
            .then_with(|| right.cmp(left)),
    })
}

/// Sorts people by name in place. Stable for equal names.
pub fn sort_people(people: &mut [Person]) {
    people.sort_by(|a, b| compare_names(&a.name, &b.name));
}
