//! Project item domain model.
//!
//! # Responsibility
//! - Define item identity (`Handle`) and the concrete item record.
//! - Keep the packed record shape used by project persistence.
//!
//! # Invariants
//! - Every tree item is addressed by one stable `Handle`.
//! - Handles are never derived from item paths or names.

pub mod handle;
pub mod item;
