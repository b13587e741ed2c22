//! Per-invocation context: lazy access to the project root, git and the
//! committer roster, committer-set fan-out, and first-run initialization.
//!
//! The CLI builds one [`Context`] per invocation and passes it down by
//! reference. Nothing is resolved until it is first read:
//!
//! - [`Context::project_root_directory`] searches upward for `.git` once and
//!   caches the answer, including a failed search.
//! - [`Context::git`] opens the repository once. A missing repository is
//!   recorded, not reported, so git-independent commands keep working.
//! - [`Context::committers`] builds the roster handle for the resolved root.
//!
//! Git and the roster register themselves as committer-set observers when
//! they are first resolved; [`Context::set_committers`] notifies every
//! registered observer in registration order.

mod errors;
mod observer;
mod slot;

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::{debug, info, instrument};

pub use errors::ContextError;
pub use observer::{ObserverKind, SetCommitterObserver};
pub use slot::Slot;

use crate::core::committer::Committer;
use crate::io::committers::Committers;
use crate::io::files::FileSystem;
use crate::io::git::Git;
use crate::io::paths::{GuetPaths, project_root};
use observer::ObserverSlot;

pub struct Context {
    working_directory: Option<PathBuf>,
    configuration_directory: PathBuf,
    file_system: Box<dyn FileSystem>,
    project_root_directory: Slot<PathBuf>,
    git: Slot<Git>,
    committers: Option<Committers>,
    observers: Vec<ObserverSlot>,
}

impl Context {
    /// `working_directory` of `None` means the process working directory.
    pub fn new(
        working_directory: Option<PathBuf>,
        file_system: Box<dyn FileSystem>,
        configuration_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            working_directory,
            configuration_directory: configuration_directory.into(),
            file_system,
            project_root_directory: Slot::Unresolved,
            git: Slot::Unresolved,
            committers: None,
            observers: Vec::new(),
        }
    }

    pub fn paths(&self) -> GuetPaths {
        GuetPaths::new(&self.configuration_directory)
    }

    /// True until the project root has been looked up.
    pub fn project_root_pending(&self) -> bool {
        self.project_root_directory.is_unresolved()
    }

    /// Absolute project root, or `None` when no `.git` is found upward.
    pub fn project_root_directory(&mut self) -> Option<&Path> {
        let working_directory = self.working_directory.clone();
        self.project_root_directory
            .resolve_once(|| {
                let start = match working_directory {
                    Some(dir) => dir,
                    None => env::current_dir().ok()?,
                };
                match project_root(&start) {
                    Ok(root) => {
                        debug!(root = %root.display(), "project root resolved");
                        Some(root)
                    }
                    Err(err) => {
                        debug!(err = %err, "no project root");
                        None
                    }
                }
            })
            .map(|root| root.as_path())
    }

    /// Git handle for the project, or `None` when there is no repository.
    pub fn git(&mut self) -> Option<&mut Git> {
        let root = if self.git.is_unresolved() {
            self.project_root_directory().map(Path::to_path_buf)
        } else {
            None
        };
        let observers = &mut self.observers;
        self.git.resolve_once(|| match Git::new(root.as_deref()) {
            Ok(git) => {
                observers.push(ObserverSlot::Git);
                Some(git)
            }
            Err(err) => {
                debug!(err = %err, "continuing without git");
                None
            }
        })
    }

    /// Roster handle for the project (or for no project).
    pub fn committers(&mut self) -> &mut Committers {
        let root = if self.committers.is_none() {
            Some(self.project_root_directory().map(Path::to_path_buf))
        } else {
            None
        };
        let configuration_directory = &self.configuration_directory;
        let observers = &mut self.observers;
        self.committers.get_or_insert_with(|| {
            observers.push(ObserverSlot::Committers);
            Committers::new(root.flatten(), configuration_directory)
        })
    }

    /// Register `observer` for future committer-set changes. Duplicates are kept.
    pub fn add_set_committer_observer(&mut self, observer: Box<dyn SetCommitterObserver>) {
        self.observers.push(ObserverSlot::External(observer));
    }

    /// Registered observers, in notification order.
    pub fn observer_kinds(&self) -> Vec<ObserverKind> {
        self.observers.iter().map(ObserverSlot::kind).collect()
    }

    /// Make `committers` the active set and notify every observer.
    ///
    /// Git and the roster are resolved first so a fresh context still records
    /// the set. Returns the committer names for display.
    #[instrument(skip_all, fields(count = committers.len()))]
    pub fn set_committers(&mut self, committers: &[Committer]) -> Result<Vec<String>> {
        if committers.is_empty() {
            return Err(ContextError::InvalidCommitters.into());
        }
        let _ = self.git();
        let _ = self.committers();

        for observer in &mut self.observers {
            match observer {
                ObserverSlot::Git => {
                    if let Some(git) = self.git.get_mut() {
                        git.notify_of_committer_set(committers)?;
                    }
                }
                ObserverSlot::Committers => {
                    if let Some(roster) = self.committers.as_mut() {
                        roster.notify_of_committer_set(committers)?;
                    }
                }
                ObserverSlot::External(external) => {
                    external.notify_of_committer_set(committers)?;
                }
            }
        }

        let names: Vec<String> = committers.iter().map(|c| c.name().to_string()).collect();
        info!(committers = %names.join(", "), "committers set");
        Ok(names)
    }

    /// Create the configuration directory and its files.
    ///
    /// Fails with [`ContextError::AlreadyInitialized`] if the directory exists;
    /// nothing is written in that case.
    #[instrument(skip_all, fields(dir = %self.configuration_directory.display()))]
    pub fn initialize(&mut self) -> Result<GuetPaths> {
        let paths = self.paths();
        if let Some(parent) = paths.dir.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        match fs::create_dir(&paths.dir) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(ContextError::AlreadyInitialized(paths.dir.clone()).into());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("create directory {}", paths.dir.display()));
            }
        }

        for path in [
            &paths.committer_names,
            &paths.committers,
            &paths.committers_set,
            &paths.errors,
        ] {
            self.file_system.get(path).read()?;
        }
        self.file_system
            .get(&paths.config)
            .write([format!("{}\n", crate::VERSION), "\n".to_string()]);
        self.file_system.save_all()?;

        info!("configuration directory initialized");
        Ok(paths)
    }
}
