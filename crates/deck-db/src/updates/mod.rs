//! Partial-update structs for mutation methods.
//!
//! `Option<T>` means "leave unchanged when `None`"; `Option<Option<T>>`
//! distinguishes "leave unchanged" from "set to NULL". The structs
//! serialize (minus untouched fields) into the audit detail column.

pub mod bug;
pub mod project;
pub mod sprint;
pub mod task;

pub use bug::BugUpdate;
pub use project::ProjectUpdate;
pub use sprint::SprintUpdate;
pub use task::TaskUpdate;
