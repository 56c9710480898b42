use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(thiserror::Error, Debug)]
pub enum UrnError {
    Malformed(String),
    UnknownClass(String),
    Version(#[from] VersionError),
}

impl Display for UrnError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UrnError::Malformed(value) => write!(f, "Malformed URN '{value}'"),
            UrnError::UnknownClass(class) => write!(f, "Unknown artefact class '{class}'"),
            UrnError::Version(err) => write!(f, "{err}"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum VersionError {
    Invalid(String, String),
}

impl Display for VersionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::Invalid(value, reason) => write!(f, "Invalid version '{value}': {reason}"),
        }
    }
}
