//! Assignment engine: roster membership and day assignment.
//!
//! # Invariants
//! - A person id appears in at most one day column.
//! - Duplicate detection only consults the roster.
//! - People lists are re-sorted by name after every insertion.

use crate::model::board::Board;
use crate::model::column::{Column, ColumnId};
use crate::model::person::{find_duplicate, normalize_name, Person, PersonId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result of a roster insertion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPersonOutcome {
    /// A new person was appended to the roster.
    Added(PersonId),
    /// A roster entry already uses this name (case-insensitive).
    DuplicateName { existing: PersonId },
    /// Input was blank after trimming.
    EmptyName,
}

/// Rejections from assignment transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentRejection {
    /// Only day columns accept assignments.
    RosterNotAssignable,
}

impl Display for AssignmentRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RosterNotAssignable => write!(f, "the roster column is not an assignment target"),
        }
    }
}

impl Error for AssignmentRejection {}

/// Adds a person to the roster.
///
/// On `DuplicateName` or `EmptyName` the returned board equals the input.
pub fn add_person(board: &Board, raw_name: &str) -> (Board, AddPersonOutcome) {
    let name = normalize_name(raw_name);
    if name.is_empty() {
        return (board.clone(), AddPersonOutcome::EmptyName);
    }
    if let Some(existing) = find_duplicate(&board.roster().people, name) {
        return (
            board.clone(),
            AddPersonOutcome::DuplicateName {
                existing: existing.id.clone(),
            },
        );
    }

    let person = Person::new(name);
    let id = person.id.clone();
    let mut next = board.clone();
    let roster = next.roster_mut();
    roster.people.push(person);
    roster.sort_people();
    (next, AddPersonOutcome::Added(id))
}

/// Removes a person from the roster and from every day column.
pub fn remove_person_globally(board: &Board, person_id: &PersonId) -> Board {
    let mut next = board.clone();
    for column in next.columns_mut() {
        column.people.retain(|person| &person.id != person_id);
    }
    next
}

/// Unassigns a person from one day column; the roster entry is kept.
///
/// Passing the roster id is a no-op; use [`remove_person_globally`].
pub fn remove_person_from_column(
    board: &Board,
    column_id: &ColumnId,
    person_id: &PersonId,
) -> Board {
    let mut next = board.clone();
    if let Some(column) = day_column_mut(&mut next, column_id) {
        column.people.retain(|person| &person.id != person_id);
    }
    next
}

/// Assigns a roster person to a day column, migrating them off any other day.
///
/// Unknown column or person ids return the board unchanged.
pub fn assign_person_to_column(
    board: &Board,
    column_id: &ColumnId,
    person_id: &PersonId,
) -> Result<Board, AssignmentRejection> {
    if column_id.is_roster() {
        return Err(AssignmentRejection::RosterNotAssignable);
    }
    let Some(person) = board.person(person_id).cloned() else {
        return Ok(board.clone());
    };
    if board.day_column(column_id).is_none() {
        return Ok(board.clone());
    }

    let mut next = board.clone();
    for column in next.day_columns_mut() {
        if &column.id == column_id {
            if !column.contains(person_id) {
                column.people.push(person.clone());
                column.sort_people();
            }
        } else {
            column.people.retain(|entry| &entry.id != person_id);
        }
    }
    Ok(next)
}

/// Roster people not present in any day column, in roster order.
pub fn unassigned_people(board: &Board) -> Vec<&Person> {
    let assigned: HashSet<&PersonId> = board
        .day_columns()
        .iter()
        .flat_map(|column| column.people.iter().map(|person| &person.id))
        .collect();
    board
        .roster()
        .people
        .iter()
        .filter(|person| !assigned.contains(&person.id))
        .collect()
}

/// The day column currently holding `person_id`, if any.
pub fn column_of<'a>(board: &'a Board, person_id: &PersonId) -> Option<&'a Column> {
    board
        .day_columns()
        .iter()
        .find(|column| column.contains(person_id))
}

fn day_column_mut<'a>(board: &'a mut Board, column_id: &ColumnId) -> Option<&'a mut Column> {
    board
        .day_columns_mut()
        .iter_mut()
        .find(|column| &column.id == column_id)
}

#[cfg(test)]
mod tests {
    use super::{
        add_person, assign_person_to_column, column_of, remove_person_from_column,
        remove_person_globally, unassigned_people, AddPersonOutcome, AssignmentRejection,
    };
    use crate::engine::lifecycle::add_column;
    use crate::model::board::Board;
    use crate::model::column::ColumnId;
    use crate::model::person::PersonId;

    fn added(outcome: AddPersonOutcome) -> PersonId {
        match outcome {
            AddPersonOutcome::Added(id) => id,
            other => panic!("expected Added, got {other:?}"),
        }
    }

    fn board_with_days(days: &[u32]) -> Board {
        days.iter().fold(Board::new(), |board, day| {
            add_column(&board, Some(*day)).unwrap().0
        })
    }

    #[test]
    fn add_person_trims_and_keeps_roster_sorted() {
        let (board, first) = add_person(&Board::new(), "  Mallory ");
        let (board, second) = add_person(&board, "alice");
        added(first);
        added(second);

        let names: Vec<_> = board.roster().people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["alice", "Mallory"]);
    }

    #[test]
    fn add_person_rejects_blank_input_without_change() {
        let board = Board::new();
        let (next, outcome) = add_person(&board, "   ");
        assert_eq!(outcome, AddPersonOutcome::EmptyName);
        assert_eq!(next, board);
    }

    #[test]
    fn duplicate_name_references_existing_person() {
        let (board, outcome) = add_person(&Board::new(), "Alice");
        let alice = added(outcome);

        let (next, outcome) = add_person(&board, " ALICE");
        assert_eq!(outcome, AddPersonOutcome::DuplicateName { existing: alice });
        assert_eq!(next, board);
    }

    #[test]
    fn assignment_migrates_between_days_and_rejects_roster() {
        let board = board_with_days(&[1, 2]);
        let (board, outcome) = add_person(&board, "Pat");
        let pat = added(outcome);

        let board = assign_person_to_column(&board, &ColumnId::for_day(1), &pat).unwrap();
        assert_eq!(column_of(&board, &pat).map(|c| c.id.clone()), Some(ColumnId::for_day(1)));

        let board = assign_person_to_column(&board, &ColumnId::for_day(2), &pat).unwrap();
        assert!(!board.day_columns()[0].contains(&pat));
        assert!(board.day_columns()[1].contains(&pat));

        let again = assign_person_to_column(&board, &ColumnId::for_day(2), &pat).unwrap();
        assert_eq!(again, board);

        let err = assign_person_to_column(&board, &ColumnId::roster(), &pat).unwrap_err();
        assert_eq!(err, AssignmentRejection::RosterNotAssignable);
    }

    #[test]
    fn assignment_to_unknown_targets_is_a_no_op() {
        let board = board_with_days(&[1]);
        let (board, outcome) = add_person(&board, "Pat");
        let pat = added(outcome);
        let board = assign_person_to_column(&board, &ColumnId::for_day(1), &pat).unwrap();

        let same = assign_person_to_column(&board, &ColumnId::for_day(5), &pat).unwrap();
        assert_eq!(same, board);
        let same = assign_person_to_column(&board, &ColumnId::for_day(1), &PersonId::new("nobody"))
            .unwrap();
        assert_eq!(same, board);
    }

    #[test]
    fn removal_from_day_keeps_roster_entry_and_global_removal_cascades() {
        let board = board_with_days(&[1]);
        let (board, outcome) = add_person(&board, "Pat");
        let pat = added(outcome);
        let day1 = ColumnId::for_day(1);
        let assigned = assign_person_to_column(&board, &day1, &pat).unwrap();

        let unassigned = remove_person_from_column(&assigned, &day1, &pat);
        assert!(unassigned.person(&pat).is_some());
        assert!(column_of(&unassigned, &pat).is_none());
        assert_eq!(unassigned_people(&unassigned).len(), 1);

        let roster_only = remove_person_from_column(&assigned, &ColumnId::roster(), &pat);
        assert_eq!(roster_only, assigned);

        let gone = remove_person_globally(&assigned, &pat);
        assert!(gone.columns().iter().all(|column| !column.contains(&pat)));
        assert_eq!(remove_person_globally(&gone, &pat), gone);
    }

    #[test]
    fn unassigned_people_follow_roster_order() {
        let board = board_with_days(&[1]);
        let (board, _) = add_person(&board, "Carol");
        let (board, bob) = add_person(&board, "Bob");
        let (board, _) = add_person(&board, "alice");
        let board = assign_person_to_column(&board, &ColumnId::for_day(1), &added(bob)).unwrap();

        let names: Vec<_> = unassigned_people(&board)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["alice", "Carol"]);
    }
}
