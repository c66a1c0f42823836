//! # deck-core
//!
//! Core types, access control, and report aggregation for Sprintdeck.
//!
//! This crate provides the foundational types shared across all Sprintdeck crates:
//! - Entity structs for all domain objects (projects, sprints, tasks, bugs, reports)
//! - Status/priority/role enums with upper-case wire codes
//! - ID prefix constants
//! - Cross-cutting error types
//! - The row-level access filter and write-permission predicates
//! - The report aggregator (burndown, progress, quality metrics)

pub mod access;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod reports;
