//! Entity structs for all Sprintdeck domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `deck-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema export.

mod audit;
mod bug;
mod project;
mod report;
mod sprint;
mod task;
mod user;

pub use audit::AuditEntry;
pub use bug::BugReport;
pub use project::Project;
pub use report::ProjectReport;
pub use sprint::Sprint;
pub use task::{Task, STORY_POINTS};
pub use user::User;
