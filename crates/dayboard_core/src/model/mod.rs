//! Board domain model.
//!
//! # Responsibility
//! - Define the person, column and board records shared by every layer.
//! - Own the structural invariants that a persisted board must satisfy.
//!
//! # Invariants
//! - The master roster is always column 0 and is never reordered.
//! - Day columns are ordered by ascending day number, without duplicates.
//! - A person is present in at most one day column.
//! - People in every column are kept in name order.

pub mod board;
pub mod collapse;
pub mod column;
pub mod person;
