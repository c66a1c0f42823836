//! Repository methods, one module per entity, all implemented on
//! [`crate::service::DeckService`].

pub mod audit;
pub mod bug;
pub mod project;
pub mod report;
pub mod sprint;
pub mod task;
pub mod user;

pub use bug::BugFilter;
pub use sprint::TimelineDay;
pub use task::TaskFilter;
