//! Progression core: season lifecycle, question attempts, progress queries
//!
//! Callers must obtain a participation through the lifecycle manager before
//! the attempt engine will accept anything for that season's questions.
//! Everything here suspends only on storage I/O; the uniqueness invariants
//! are enforced by the storage layer, not by the pre-checks in this crate.

pub mod attempts;
pub mod lifecycle;
pub mod progress;

#[cfg(test)]
mod attempts_test;
#[cfg(test)]
mod lifecycle_test;

pub use attempts::AttemptEngine;
pub use lifecycle::SeasonLifecycle;
pub use progress::ProgressQueries;
