//! YAML seed files for the standalone server
//!
//! Lets the server run without a host tracker: projects, users (with their
//! per-project access levels), bugs and parent relationships are loaded
//! into the in-memory store at startup.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use simple_kanban::types::{AccessLevel, Bug, BugId, PriorityCode, ProjectId, StatusCode, User, UserId};
use simple_kanban::{BoardError, MemoryTicketStore, Result};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub projects: Vec<SeedProject>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub bugs: Vec<SeedBug>,
    #[serde(default)]
    pub relationships: Vec<SeedLink>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProject {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub id: u32,
    pub username: String,
    #[serde(default)]
    pub realname: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// project id -> access level
    #[serde(default)]
    pub access: BTreeMap<u32, u32>,
}

#[derive(Debug, Deserialize)]
pub struct SeedBug {
    pub id: u32,
    pub project: u32,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub status: u32,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default = "default_severity")]
    pub severity: u32,
    pub reporter: u32,
    #[serde(default)]
    pub handler: Option<u32>,
    #[serde(default = "Utc::now")]
    pub date_submitted: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub steps_to_reproduce: String,
    #[serde(default)]
    pub additional_information: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedLink {
    pub child: u32,
    pub parent: u32,
}

fn default_true() -> bool {
    true
}

fn default_priority() -> u32 {
    30
}

fn default_severity() -> u32 {
    50
}

/// Parse a seed document.
pub fn parse(yaml: &str) -> Result<SeedFile> {
    serde_yaml_ng::from_str(yaml)
        .map_err(|error| BoardError::store(format!("invalid seed file: {error}")))
}

/// Load a seed file from disk into the store.
pub async fn load(store: &MemoryTicketStore, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)?;
    apply(store, parse(&raw)?).await;
    Ok(())
}

/// Apply a parsed seed to the store.
pub async fn apply(store: &MemoryTicketStore, seed: SeedFile) {
    for project in &seed.projects {
        store
            .insert_project(ProjectId::new(project.id), project.name.clone())
            .await;
    }
    for entry in &seed.users {
        let mut user =
            User::new(UserId::new(entry.id), entry.username.clone()).with_realname(&entry.realname);
        if !entry.enabled {
            user = user.disabled();
        }
        store.insert_user(user).await;
        for (project, level) in &entry.access {
            store
                .grant(
                    ProjectId::new(*project),
                    UserId::new(entry.id),
                    AccessLevel::new(*level),
                )
                .await;
        }
    }
    for bug in seed.bugs {
        store
            .insert_bug(Bug {
                id: BugId::new(bug.id),
                project: ProjectId::new(bug.project),
                summary: bug.summary,
                description: bug.description,
                status: StatusCode::new(bug.status),
                priority: PriorityCode::new(bug.priority),
                severity: bug.severity,
                reporter: UserId::new(bug.reporter),
                handler: bug.handler.map(UserId::new),
                date_submitted: bug.date_submitted,
                last_updated: bug.last_updated,
                steps_to_reproduce: bug.steps_to_reproduce,
                additional_information: bug.additional_information,
            })
            .await;
    }
    for link in &seed.relationships {
        store
            .link_parent(BugId::new(link.child), BugId::new(link.parent))
            .await;
    }
    tracing::info!(
        projects = seed.projects.len(),
        users = seed.users.len(),
        links = seed.relationships.len(),
        "seeded in-memory store"
    );
}
