use crate::errors::{StoreError, StoreResult};
use crate::path;
use common::sdmx;
use common::sdmx::annotation::anno_generated;
use common::sdmx::Message;
use common::types::artefact::{Artefact, MaintainableArtefact, StructureMessage};
use common::types::urn::Urn;
use common::types::version::{Increment, Version};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Attach a `tdc-generated` provenance annotation before writing
    pub annotate: bool,
    /// Overwrite an existing file
    pub force: bool,
}

impl WriteOptions {
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_annotate(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { annotate: true, force: false }
    }
}

/// File-based storage of artefacts below [BaseStore::root], one file per
/// (class, maintainer, id, version).
pub trait BaseStore {
    fn root(&self) -> &Path;

    /// Short name used in log messages
    fn label(&self) -> &'static str;

    fn path_for(&self, artefact: &Artefact) -> PathBuf {
        path::path_for(self.root(), artefact)
    }

    fn path_for_urn(&self, urn: &Urn) -> PathBuf {
        path::path_for_urn(self.root(), urn)
    }

    /// Load the artefact identified by `urn`.
    ///
    /// A URN without version refers to the unversioned file name; the union store
    /// resolves partial URNs to the latest version before calling this.
    fn get(&self, urn: &Urn) -> StoreResult<Artefact> {
        let path = self.path_for_urn(urn);
        if !path.exists() {
            return Err(StoreError::NotFound(urn.clone()));
        }
        debug!(target: "store", "Reading {} from {}", urn.shorten(), path.display());

        let found = match sdmx::read_xml(&path)? {
            Message::Structure(message) => message.find(urn).cloned().map(Artefact::Maintainable),
            Message::Data(data_sets) => data_sets
                .into_iter()
                .find(|ds| ds.urn() == *urn)
                .map(Artefact::DataSet),
        };

        found.ok_or_else(|| {
            StoreError::Integrity(format!("{} does not contain {}", path.display(), urn.shorten()))
        })
    }

    fn write(&self, artefact: &mut Artefact, options: WriteOptions) -> StoreResult<PathBuf> {
        self.write_file(artefact, options)
    }

    /// Write every artefact in `message` to its own file.
    ///
    /// Not atomic: on error, artefacts before the failing one remain written.
    fn write_structures(
        &self,
        message: &mut StructureMessage,
        options: WriteOptions,
    ) -> StoreResult<Vec<PathBuf>> {
        write_each(self, message, options)
    }

    /// Serialize `artefact` to its path. Data sets additionally get a sibling CSV
    /// file. Text is trimmed in place first, so `artefact` equals what a later
    /// [BaseStore::get] returns.
    fn write_file(&self, artefact: &mut Artefact, options: WriteOptions) -> StoreResult<PathBuf> {
        let path = self.path_for(artefact);

        if path.exists() && !options.force {
            return Err(StoreError::AlreadyExists(path));
        }

        // Make the parent directory, but not multiple parents
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir(parent)?;
            }
        }

        if options.annotate {
            anno_generated(artefact.annotations_mut());
        }
        artefact.trim_text();

        sdmx::write_xml(artefact, &path)?;
        info!(target: "store", "Wrote {}", path.display());

        if let Artefact::DataSet(ds) = artefact {
            let csv_path = path.with_extension("csv");
            sdmx::write_csv(ds, &csv_path)?;
            info!(target: "store", "Wrote {}", csv_path.display());
        }

        Ok(path)
    }

    /// URNs of everything stored for `maintainer`, sorted.
    fn list(&self, maintainer: &str) -> StoreResult<Vec<Urn>> {
        let dir = self.root().join(maintainer);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut urns = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let file_name = entry?.file_name();
            if let Some(urn) = path::parse_file_name(maintainer, &file_name.to_string_lossy()) {
                urns.push(urn);
            }
        }
        urns.sort();

        Ok(urns)
    }

    /// Every stored version of the artefact identified by `urn` (whose own version
    /// is ignored), in ascending order.
    fn list_versions(&self, urn: &Urn) -> StoreResult<Vec<Version>> {
        let dir = self.path_for_urn(urn).parent().map(Path::to_path_buf).unwrap_or_default();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let pattern = path::versions_pattern(urn);
        let mut versions = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();
            let Some(caps) = pattern.captures(&file_name) else {
                continue;
            };

            let version = Version::from_file_token(&caps["version"]).map_err(|err| {
                StoreError::Integrity(format!("{} in {}: {}", file_name, dir.display(), err))
            })?;
            versions.push(version);
        }
        versions.sort();

        Ok(versions)
    }

    /// The greatest stored version of `urn`, bumped according to `increment`.
    fn next_version(&self, urn: &Urn, increment: Increment) -> StoreResult<Version> {
        let latest = self
            .list_versions(urn)?
            .pop()
            .ok_or_else(|| StoreError::NoVersions(urn.clone()))?;
        Ok(latest.increment(increment)?)
    }

    /// Set the version of `artefact`.
    ///
    /// Without an increment this is the greatest stored version, or `default` if
    /// none is stored. Otherwise it is [BaseStore::next_version].
    fn assign_version(
        &self,
        artefact: &mut MaintainableArtefact,
        default: Version,
        increment: Increment,
    ) -> StoreResult<()> {
        let urn = artefact.urn();
        let version = if increment.is_none() {
            self.list_versions(&urn)?.pop().unwrap_or(default)
        } else {
            self.next_version(&urn, increment)?
        };

        debug!(target: "store", "Assigned version {} to {}", version, urn.with_version(None).shorten());
        artefact.version = Some(version);
        Ok(())
    }
}

pub(crate) fn write_each<S: BaseStore + ?Sized>(
    store: &S,
    message: &mut StructureMessage,
    options: WriteOptions,
) -> StoreResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for ma in message.iter_mut() {
        let mut artefact = Artefact::Maintainable(ma.clone());
        paths.push(store.write(&mut artefact, options)?);
        if let Artefact::Maintainable(written) = artefact {
            *ma = written;
        }
    }
    Ok(paths)
}
