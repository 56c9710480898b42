use common::sdmx::SdmxError;
use common::types::errors::{UrnError, VersionError};
use common::types::urn::Urn;
use std::fmt::Display;
use std::path::PathBuf;
use std::{fmt, io};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// No file for the requested artefact. Callers check for existence with this.
    NotFound(Urn),
    /// Writing would overwrite an existing file and `force` was not given.
    AlreadyExists(PathBuf),
    /// No version of the artefact is stored, so none can be incremented.
    NoVersions(Urn),
    /// The registry has not been cloned yet.
    NotCloned(PathBuf),
    /// Files on disk violate the store's naming or content conventions.
    Integrity(String),
    IO(#[from] io::Error),
    Sdmx(#[from] SdmxError),
    Urn(#[from] UrnError),
    Version(#[from] VersionError),
    Git(#[from] git2::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::NotFound(urn) => write!(f, "No object {}", urn.shorten()),
            StoreError::AlreadyExists(path) => {
                write!(f, "Will not overwrite {} without force", path.display())
            }
            StoreError::NoVersions(urn) => write!(f, "No stored versions of {}", urn.shorten()),
            StoreError::NotCloned(path) => write!(
                f,
                "No registry clone at {}; run `tdc store clone` first",
                path.display()
            ),
            StoreError::Integrity(what) => write!(f, "Store integrity violated: {what}"),
            StoreError::IO(err) => write!(f, "{err}"),
            StoreError::Sdmx(err) => write!(f, "{err}"),
            StoreError::Urn(err) => write!(f, "{err}"),
            StoreError::Version(err) => write!(f, "{err}"),
            StoreError::Git(err) => write!(f, "Git: {}", err.message()),
        }
    }
}
