//! Mapping between artefact identities and file names.
//!
//! `{root}/{maintainer}/{Class}_{maintainer}_{id}[_{version}].xml`, with the dots of
//! the version replaced by dashes. A data set lives next to the dataflow describing
//! it, its file name differing only in the class token.

use common::types::artefact::{Artefact, ArtefactClass};
use common::types::urn::Urn;
use common::types::version::Version;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const SUFFIX: &str = "xml";

static VERSIONED_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<id>.+)_(?P<version>[0-9]+-[0-9]+-[0-9]+)$").unwrap());

pub fn file_stem(urn: &Urn) -> String {
    let mut stem = format!("{}_{}_{}", urn.class.name(), urn.maintainer, urn.id);
    if let Some(version) = &urn.version {
        stem.push('_');
        stem.push_str(&version.file_token());
    }
    stem
}

pub fn path_for_urn(root: &Path, urn: &Urn) -> PathBuf {
    root.join(&urn.maintainer)
        .join(format!("{}.{}", file_stem(urn), SUFFIX))
}

pub fn path_for(root: &Path, artefact: &Artefact) -> PathBuf {
    match artefact {
        Artefact::Maintainable(ma) => path_for_urn(root, &ma.urn()),
        Artefact::DataSet(ds) => {
            let structure_path = path_for_urn(root, &ds.described_by);
            let file_name = structure_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
                .replacen(ds.described_by.class.name(), ds.kind.class().name(), 1);
            structure_path.with_file_name(file_name)
        }
    }
}

/// Pattern matching the file names of every version of `urn`.
///
/// The version token must contain a dash, so an unversioned artefact whose id
/// continues with `_` and digits (`CL_2020` next to `CL`) is not taken for a version.
pub fn versions_pattern(urn: &Urn) -> Regex {
    let unversioned = file_stem(&urn.with_version(None));
    Regex::new(&format!(
        r"^{}_(?P<version>[0-9]+(?:-[0-9]+)+)\.{}$",
        regex::escape(&unversioned),
        SUFFIX
    ))
    .unwrap()
}

/// Recover the identity of the artefact stored in `file_name` within the
/// directory of `maintainer`.
pub fn parse_file_name(maintainer: &str, file_name: &str) -> Option<Urn> {
    let stem = file_name.strip_suffix(&format!(".{SUFFIX}"))?;
    let (class, rest) = stem.split_once('_')?;
    let class = ArtefactClass::from_name(class)?;
    let rest = rest.strip_prefix(maintainer)?.strip_prefix('_')?;

    let (id, version) = match VERSIONED_TAIL.captures(rest) {
        Some(caps) => (
            caps["id"].to_string(),
            Some(Version::from_file_token(&caps["version"]).ok()?),
        ),
        None => (rest.to_string(), None),
    };

    Some(Urn::new(class, maintainer, &id, version))
}
