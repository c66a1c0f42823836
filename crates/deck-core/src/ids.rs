//! ID prefix constants.
//!
//! Every entity ID is `<prefix>-<8 hex chars>`, generated by the storage
//! layer (see `deck-db`). The prefix makes IDs self-describing in logs
//! and CLI output.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_SPRINT: &str = "spr";
pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_BUG: &str = "bug";
pub const PREFIX_REPORT: &str = "rpt";
pub const PREFIX_AUDIT: &str = "aud";
