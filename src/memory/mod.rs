//! In-process memory store with exact Euclidean nearest-neighbour search.
//!
//! Records are append-only and identified by insertion index; the only way to
//! remove them is a whole-store reset.

mod search;

// pub(crate): module internals hidden; public items re-exported explicitly via lib.rs
pub(crate) mod store;

pub use store::{MemoryStore, validate};

#[cfg(test)]
mod tests;
