//! Committer roster and per-project current committers.
//!
//! The roster (`committers`) holds one `initials,name,email` line per known
//! committer. The current committers of each project live in `committersset`
//! (see [`crate::core::committers_set`]).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::errors_log::epoch_millis;
use super::files::{read_lines, write_atomic};
use super::paths::GuetPaths;
use crate::context::SetCommitterObserver;
use crate::core::committer::Committer;
use crate::core::committers_set::{CommitterSetRecord, find_record, replace_record};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("a committer with initials '{0}' already exists")]
    DuplicateInitials(String),
    #[error("no committer with initials '{0}'")]
    UnknownInitials(String),
    #[error("initials '{0}' given more than once")]
    RepeatedInitials(String),
    #[error("not inside a git project, so there is nowhere to record committers")]
    NoProjectRoot,
}

/// Roster handle scoped to one project root (or none).
#[derive(Debug, Clone)]
pub struct Committers {
    project_root: Option<PathBuf>,
    paths: GuetPaths,
}

impl Committers {
    pub fn new(project_root: Option<PathBuf>, configuration_directory: &Path) -> Self {
        Self {
            project_root,
            paths: GuetPaths::new(configuration_directory),
        }
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Every committer in the roster, in file order.
    pub fn all(&self) -> Result<Vec<Committer>> {
        if !self.paths.committers.exists() {
            return Ok(Vec::new());
        }
        read_lines(&self.paths.committers)?
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                Committer::parse_record(line)
                    .with_context(|| format!("parse {}", self.paths.committers.display()))
            })
            .collect()
    }

    /// Look up committers in the order the initials are given.
    pub fn by_initials<S: AsRef<str>>(&self, initials: &[S]) -> Result<Vec<Committer>> {
        let all = self.all()?;
        initials
            .iter()
            .map(|wanted| {
                let wanted = wanted.as_ref();
                all.iter()
                    .find(|c| c.initials() == wanted)
                    .cloned()
                    .ok_or_else(|| RosterError::UnknownInitials(wanted.to_string()).into())
            })
            .collect()
    }

    #[instrument(skip_all, fields(initials = committer.initials()))]
    pub fn add(&self, committer: Committer) -> Result<()> {
        let mut all = self.all()?;
        if all.iter().any(|c| c.initials() == committer.initials()) {
            return Err(RosterError::DuplicateInitials(committer.initials().to_string()).into());
        }
        all.push(committer);
        self.write_roster(&all)?;
        info!("committer added");
        Ok(())
    }

    #[instrument(skip_all, fields(initials))]
    pub fn remove(&self, initials: &str) -> Result<Committer> {
        let mut all = self.all()?;
        let idx = all
            .iter()
            .position(|c| c.initials() == initials)
            .ok_or_else(|| RosterError::UnknownInitials(initials.to_string()))?;
        let removed = all.remove(idx);
        self.write_roster(&all)?;
        info!("committer removed");
        Ok(removed)
    }

    /// Committers currently set for this project, author first.
    ///
    /// Initials that are no longer in the roster are skipped.
    pub fn current(&self) -> Result<Vec<Committer>> {
        let Some(root) = self.project_root.as_deref() else {
            debug!("no project root, no current committers");
            return Ok(Vec::new());
        };
        if !self.paths.committers_set.exists() {
            return Ok(Vec::new());
        }
        let lines = read_lines(&self.paths.committers_set)?;
        let Some(record) = find_record(&lines, root) else {
            return Ok(Vec::new());
        };
        let all = self.all()?;
        Ok(record
            .initials
            .iter()
            .filter_map(|initials| {
                let found = all.iter().find(|c| c.initials() == initials).cloned();
                if found.is_none() {
                    warn!(initials = %initials, "current committer missing from roster");
                }
                found
            })
            .collect())
    }

    fn write_roster(&self, committers: &[Committer]) -> Result<()> {
        let contents: String = committers
            .iter()
            .map(|c| format!("{}\n", c.to_record()))
            .collect();
        write_atomic(&self.paths.committers, &contents)
    }

    fn write_current(&self, committers: &[Committer]) -> Result<()> {
        let root = self
            .project_root
            .as_deref()
            .ok_or(RosterError::NoProjectRoot)?;
        let lines = if self.paths.committers_set.exists() {
            read_lines(&self.paths.committers_set)?
        } else {
            Vec::new()
        };
        let record = CommitterSetRecord::new(committers, epoch_millis(), root);
        let mut contents = replace_record(&lines, &record).join("\n");
        contents.push('\n');
        write_atomic(&self.paths.committers_set, &contents)
    }
}

impl SetCommitterObserver for Committers {
    fn notify_of_committer_set(&mut self, committers: &[Committer]) -> Result<()> {
        debug!(count = committers.len(), "recording current committers");
        self.write_current(committers)
    }
}
