use crate::base::{write_each, BaseStore, WriteOptions};
use crate::errors::{StoreError, StoreResult};
use common::types::artefact::{Artefact, StructureMessage};
use git2::build::RepoBuilder;
use git2::{Repository, Status, StatusOptions};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// A store in a local clone of the Git registry repository.
///
/// Written files are staged in the Git index but never committed: changes are
/// left for review with `git status`/`git diff` and a manual commit.
#[derive(Debug)]
pub struct Registry {
    root: PathBuf,
    remote_url: String,
}

impl Registry {
    /// Does not clone; warns if there is no clone at `root` yet.
    pub fn new(root: impl Into<PathBuf>, remote_url: &str) -> Self {
        let registry = Self {
            root: root.into(),
            remote_url: remote_url.to_string(),
        };

        if !registry.is_cloned() {
            warn!(
                target: "registry",
                "No registry clone at {}; run `tdc store clone` to create one",
                registry.root.display()
            );
        }

        registry
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn is_cloned(&self) -> bool {
        Repository::open(&self.root).is_ok()
    }

    /// Clone the remote registry into [BaseStore::root].
    pub fn clone_remote(&self) -> StoreResult<()> {
        if self.root.exists() && fs::read_dir(&self.root)?.next().is_some() {
            return Err(StoreError::AlreadyExists(self.root.clone()));
        }

        info!(target: "registry", "Cloning {} into {}", self.remote_url, self.root.display());
        RepoBuilder::new().clone(&self.remote_url, &self.root)?;

        Ok(())
    }

    /// Paths with changes relative to HEAD or in the working tree, with their
    /// status.
    pub fn status(&self) -> StoreResult<Vec<(String, Status)>> {
        let repo = Repository::open(&self.root)?;
        let mut options = StatusOptions::new();
        options.include_untracked(true);

        let statuses = repo.statuses(Some(&mut options))?;
        let entries = statuses
            .iter()
            .filter_map(|entry| entry.path().map(|p| (p.to_string(), entry.status())))
            .collect();

        Ok(entries)
    }

    /// `git add` the file at `path`. Failures are reported but not returned: the
    /// file on disk is the canonical state.
    fn stage(&self, path: &Path) {
        if let Err(err) = self.try_stage(path) {
            warn!(target: "registry", "Could not stage {}: {}", path.display(), err.message());
        }
    }

    fn try_stage(&self, path: &Path) -> Result<(), git2::Error> {
        let repo = Repository::open(&self.root)?;
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| git2::Error::from_str("path is outside the registry"))?;

        if repo.is_path_ignored(relative)? {
            warn!(
                target: "registry",
                "{} is ignored by a .gitignore file and was not staged",
                relative.display()
            );
            return Ok(());
        }

        let mut index = repo.index()?;
        index.add_path(relative)?;
        index.write()?;
        debug!(target: "registry", "Staged {}", relative.display());

        Ok(())
    }

    fn log_status(&self) {
        match self.status() {
            Ok(entries) => {
                for (path, status) in entries {
                    info!(target: "registry", "{:?} {}", status, path);
                }
            }
            Err(err) => warn!(target: "registry", "Could not read status: {}", err),
        }
    }
}

impl BaseStore for Registry {
    fn root(&self) -> &Path {
        &self.root
    }

    fn label(&self) -> &'static str {
        "registry"
    }

    fn write(&self, artefact: &mut Artefact, options: WriteOptions) -> StoreResult<PathBuf> {
        if !self.root.is_dir() {
            return Err(StoreError::NotCloned(self.root.clone()));
        }

        let path = self.write_file(artefact, options)?;
        self.stage(&path);

        Ok(path)
    }

    fn write_structures(
        &self,
        message: &mut StructureMessage,
        options: WriteOptions,
    ) -> StoreResult<Vec<PathBuf>> {
        let paths = write_each(self, message, options)?;
        self.log_status();

        Ok(paths)
    }
}
