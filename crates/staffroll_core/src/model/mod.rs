//! Domain model for school-staff records.
//!
//! # Responsibility
//! - Define persons, staff, establishments, courses, documents and
//!   time-bound assignments.
//! - Provide closed choice sets with stable storage codes.
//!
//! # Invariants
//! - Every record exposes `validate()`; storage refuses records that fail it.
//! - Person-like records carry exactly one identifier.

pub mod assignment;
pub mod choices;
pub mod document;
pub mod establishment;
pub mod person;
pub mod rules;
pub mod staff;
