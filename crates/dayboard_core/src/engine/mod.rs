//! Pure board transitions.
//!
//! # Responsibility
//! - Move people between the roster and day columns.
//! - Create, renumber and delete day columns.
//!
//! # Invariants
//! - Every transition takes `&Board` and returns a new `Board`; the input is
//!   never observed half-updated.
//! - Unknown person or column ids leave the board unchanged.
//! - Rejected transitions (`Err`) leave the board unchanged.

pub mod assignment;
pub mod lifecycle;
