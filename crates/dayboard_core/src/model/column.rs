//! Column records: the master roster and numbered day columns.
//!
//! # Invariants
//! - The roster column uses the fixed id `customers` and never has a day number.
//! - A day column's id and title are derived from its day number.

use super::person::{sort_people, Person, PersonId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Well-known id of the master roster column.
pub const ROSTER_COLUMN_ID: &str = "customers";
/// Fixed display label of the master roster column.
pub const ROSTER_TITLE: &str = "Customers";

const DAY_ID_PREFIX: &str = "day-";

/// Column identifier as stored on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn roster() -> Self {
        Self(ROSTER_COLUMN_ID.to_string())
    }

    /// Derives the id of the day column numbered `day_number`.
    pub fn for_day(day_number: u32) -> Self {
        Self(format!("{DAY_ID_PREFIX}{day_number}"))
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_roster(&self) -> bool {
        self.0 == ROSTER_COLUMN_ID
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the display title of a day column.
pub fn day_title(day_number: u32) -> String {
    format!("#{day_number} Day")
}

/// One board column.
///
/// Field names follow the persisted JSON shape (`dayNumber`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub people: Vec<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_number: Option<u32>,
}

impl Column {
    /// Creates an empty master roster column.
    pub fn roster() -> Self {
        Self {
            id: ColumnId::roster(),
            title: ROSTER_TITLE.to_string(),
            people: Vec::new(),
            day_number: None,
        }
    }

    /// Creates an empty day column with derived id and title.
    pub fn day(day_number: u32) -> Self {
        Self {
            id: ColumnId::for_day(day_number),
            title: day_title(day_number),
            people: Vec::new(),
            day_number: Some(day_number),
        }
    }

    pub fn is_roster(&self) -> bool {
        self.id.is_roster()
    }

    pub fn contains(&self, person_id: &PersonId) -> bool {
        self.people.iter().any(|person| &person.id == person_id)
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub(crate) fn sort_people(&mut self) {
        sort_people(&mut self.people);
    }
}
