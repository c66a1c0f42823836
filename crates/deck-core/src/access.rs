//! Row-level access control.
//!
//! Visibility follows project membership: a record is visible when the
//! viewer manages or is a member of its (parent) project, or when the
//! viewer is elevated (ADMIN role or superuser). Entities dispatch on
//! their [`Affiliation`]: a project checks its own grant, project-related
//! records check the parent project's grant, unaffiliated records (users)
//! are visible to any authenticated viewer.
//!
//! Write permission is coarser: only MANAGER/ADMIN roles (or superusers)
//! may create, update, or delete projects, sprints, tasks, and bugs.

use std::collections::{HashMap, HashSet};

use crate::entities::{BugReport, Project, ProjectReport, Sprint, Task, User};
use crate::enums::Role;

/// The acting user for an access-controlled operation.
///
/// Always passed explicitly — there is no ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
    pub is_superuser: bool,
}

impl Actor {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
            is_superuser: user.is_superuser,
        }
    }

    /// Elevated actors bypass row-level filtering entirely.
    #[must_use]
    pub const fn is_elevated(&self) -> bool {
        self.is_superuser || matches!(self.role, Role::Admin)
    }
}

/// Who may see a single project: its manager plus its members.
#[derive(Debug, Clone, Default)]
pub struct ProjectGrant {
    pub manager_id: String,
    pub member_ids: HashSet<String>,
}

impl ProjectGrant {
    /// The manager-OR-member predicate.
    #[must_use]
    pub fn allows(&self, user_id: &str) -> bool {
        self.manager_id == user_id || self.member_ids.contains(user_id)
    }
}

/// Lookup from project id to its grant, built by the caller from
/// whatever projects are relevant to the collection being filtered.
#[derive(Debug, Clone, Default)]
pub struct GrantDirectory {
    grants: HashMap<String, ProjectGrant>,
}

impl GrantDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, project_id: impl Into<String>, grant: ProjectGrant) {
        self.grants.insert(project_id.into(), grant);
    }

    /// Register a project entity's own grant.
    pub fn insert_project(&mut self, project: &Project) {
        self.insert(
            project.id.clone(),
            ProjectGrant {
                manager_id: project.manager_id.clone(),
                member_ids: project.member_ids.iter().cloned().collect(),
            },
        );
    }

    #[must_use]
    pub fn get(&self, project_id: &str) -> Option<&ProjectGrant> {
        self.grants.get(project_id)
    }
}

/// How a record relates to a project, for filter dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affiliation<'a> {
    /// The record IS a project; its own id keys the grant lookup.
    Project,
    /// The record belongs to the project with this id.
    Related(&'a str),
    /// The record has no project affiliation and is never row-filtered.
    None,
}

/// A record that can be row-filtered by project affiliation.
pub trait ProjectScoped {
    fn scoped_id(&self) -> &str;
    fn affiliation(&self) -> Affiliation<'_>;
}

impl ProjectScoped for Project {
    fn scoped_id(&self) -> &str {
        &self.id
    }

    fn affiliation(&self) -> Affiliation<'_> {
        Affiliation::Project
    }
}

impl ProjectScoped for Sprint {
    fn scoped_id(&self) -> &str {
        &self.id
    }

    fn affiliation(&self) -> Affiliation<'_> {
        Affiliation::Related(&self.project_id)
    }
}

impl ProjectScoped for Task {
    fn scoped_id(&self) -> &str {
        &self.id
    }

    fn affiliation(&self) -> Affiliation<'_> {
        Affiliation::Related(&self.project_id)
    }
}

impl ProjectScoped for BugReport {
    fn scoped_id(&self) -> &str {
        &self.id
    }

    fn affiliation(&self) -> Affiliation<'_> {
        Affiliation::Related(&self.project_id)
    }
}

impl ProjectScoped for ProjectReport {
    fn scoped_id(&self) -> &str {
        &self.id
    }

    fn affiliation(&self) -> Affiliation<'_> {
        Affiliation::Related(&self.project_id)
    }
}

impl ProjectScoped for User {
    fn scoped_id(&self) -> &str {
        &self.id
    }

    fn affiliation(&self) -> Affiliation<'_> {
        Affiliation::None
    }
}

/// Restrict `records` to those `viewer` is entitled to see.
///
/// - unauthenticated viewer: empty result
/// - elevated viewer: collection unchanged
/// - otherwise: manager-OR-member predicate per record affiliation
///
/// The result is duplicate-free by record id (a user who is both manager
/// and member yields the record exactly once).
#[must_use]
pub fn filter<T: ProjectScoped>(
    viewer: Option<&Actor>,
    records: Vec<T>,
    grants: &GrantDirectory,
) -> Vec<T> {
    let Some(actor) = viewer else {
        return Vec::new();
    };

    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| actor.is_elevated() || grant_allows(actor, record, grants))
        .filter(|record| seen.insert(record.scoped_id().to_string()))
        .collect()
}

/// Object-level mirror of [`filter`] for single-record reads.
#[must_use]
pub fn can_access<T: ProjectScoped>(
    viewer: Option<&Actor>,
    record: &T,
    grants: &GrantDirectory,
) -> bool {
    let Some(actor) = viewer else {
        return false;
    };
    actor.is_elevated() || grant_allows(actor, record, grants)
}

/// Whether `viewer` may create, update, or delete project-scoped records.
#[must_use]
pub fn can_write(viewer: Option<&Actor>) -> bool {
    viewer.is_some_and(|actor| {
        actor.is_superuser || matches!(actor.role, Role::Admin | Role::Manager)
    })
}

fn grant_allows<T: ProjectScoped>(actor: &Actor, record: &T, grants: &GrantDirectory) -> bool {
    let project_id = match record.affiliation() {
        Affiliation::None => return true,
        Affiliation::Project => record.scoped_id(),
        Affiliation::Related(project_id) => project_id,
    };
    grants
        .get(project_id)
        .is_some_and(|grant| grant.allows(&actor.id))
}
