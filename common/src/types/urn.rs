use crate::types::artefact::ArtefactClass;
use crate::types::errors::UrnError;
use crate::types::version::Version;
use regex::Regex;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

pub const URN_BASE: &str = "urn:sdmx:org.sdmx.infomodel.";

static FULL_URN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^urn:sdmx:org\.sdmx\.infomodel\.(?P<package>[a-z]+)\.(?P<class>[A-Za-z]+)=(?P<agency>[A-Za-z0-9_@$.\-]+):(?P<id>[A-Za-z0-9_@$\-]+)(?:\((?P<version>[^()]*)\))?$",
    )
    .unwrap()
});

static SHORT_URN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<class>[A-Za-z]+)=(?P<rest>.+)$").unwrap());

/// Identity of a stored artefact: `{class}={maintainer}:{id}({version})`.
///
/// `version` is [None] for a partial URN, which the union store resolves to the
/// greatest stored version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Urn {
    pub class: ArtefactClass,
    pub maintainer: String,
    pub id: String,
    pub version: Option<Version>,
}

impl Urn {
    pub fn new(class: ArtefactClass, maintainer: &str, id: &str, version: Option<Version>) -> Self {
        Self {
            class,
            maintainer: maintainer.to_string(),
            id: id.to_string(),
            version,
        }
    }

    /// Parse a short (`Codelist=TEST:FRUIT(1.0.0)`) or long URN.
    pub fn parse(value: &str) -> Result<Self, UrnError> {
        let full = expand(value)?;
        let caps = FULL_URN
            .captures(&full)
            .ok_or_else(|| UrnError::Malformed(value.to_string()))?;

        let class = ArtefactClass::from_name(&caps["class"])
            .ok_or_else(|| UrnError::UnknownClass(caps["class"].to_string()))?;
        let version = caps
            .name("version")
            .map(|v| v.as_str().parse::<Version>())
            .transpose()?;

        Ok(Self {
            class,
            maintainer: caps["agency"].to_string(),
            id: caps["id"].to_string(),
            version,
        })
    }

    pub fn with_version(&self, version: Option<Version>) -> Self {
        Self { version, ..self.clone() }
    }

    pub fn with_class(&self, class: ArtefactClass) -> Self {
        Self { class, ..self.clone() }
    }

    /// Same artefact, ignoring the version.
    pub fn same_artefact(&self, other: &Urn) -> bool {
        self.class == other.class && self.maintainer == other.maintainer && self.id == other.id
    }

    /// The URN without the namespace prefix, e.g. `Codelist=TEST:FRUIT(1.0.0)`.
    pub fn shorten(&self) -> String {
        let mut out = format!("{}={}:{}", self.class.urn_name(), self.maintainer, self.id);
        if let Some(version) = &self.version {
            out.push_str(&format!("({version})"));
        }
        out
    }
}

impl Display for Urn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}.{}", URN_BASE, self.class.package(), self.shorten())
    }
}

impl FromStr for Urn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Convert a possibly partial `value` to a complete URN string.
///
/// Values already carrying the namespace prefix are returned as-is. This does not
/// touch any store.
pub fn expand(value: &str) -> Result<String, UrnError> {
    let value = value.trim();
    if value.starts_with("urn:sdmx:") {
        return Ok(value.to_string());
    }

    let caps = SHORT_URN
        .captures(value)
        .ok_or_else(|| UrnError::Malformed(value.to_string()))?;
    let class = ArtefactClass::from_name(&caps["class"])
        .ok_or_else(|| UrnError::UnknownClass(caps["class"].to_string()))?;

    Ok(format!("{}{}.{}={}", URN_BASE, class.package(), class.urn_name(), &caps["rest"]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_long_forms_agree() {
        let short = Urn::parse("Codelist=TEST:FRUIT(1.0.0)").unwrap();
        let long = Urn::parse("urn:sdmx:org.sdmx.infomodel.codelist.Codelist=TEST:FRUIT(1.0.0)").unwrap();

        assert_eq!(short, long);
        assert_eq!(ArtefactClass::Codelist, short.class);
        assert_eq!("TEST", short.maintainer);
        assert_eq!("FRUIT", short.id);
        assert_eq!(Some(Version::new(1, 0, 0)), short.version);
    }

    #[test]
    fn test_partial() {
        let urn = Urn::parse("AgencyScheme=TDCI:TDCI").unwrap();
        assert_eq!(None, urn.version);
        assert_eq!("urn:sdmx:org.sdmx.infomodel.base.AgencyScheme=TDCI:TDCI", urn.to_string());

        let urn = Urn::parse("urn:sdmx:org.sdmx.infomodel.base.AgencyScheme=TDCI:TDCI(0.0.1)").unwrap();
        assert_eq!(Some(Version::new(0, 0, 1)), urn.version);
    }

    #[test]
    fn test_class_aliases() {
        let a = Urn::parse("DataStructure=TEST:MASS(1.0.0)").unwrap();
        let b = Urn::parse("DataStructureDefinition=TEST:MASS(1.0.0)").unwrap();
        assert_eq!(a, b);
        assert_eq!(ArtefactClass::DataStructureDefinition, a.class);
        assert_eq!("DataStructure=TEST:MASS(1.0.0)", b.shorten());
    }

    #[test]
    fn test_expand() {
        assert_eq!(
            "urn:sdmx:org.sdmx.infomodel.datastructure.Dataflow=TEST:MASS",
            expand("DataflowDefinition=TEST:MASS").unwrap()
        );
        let full = "urn:sdmx:org.sdmx.infomodel.codelist.Codelist=TEST:COLOUR(1.0.0)";
        assert_eq!(full, expand(full).unwrap());
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(Urn::parse("FRUIT"), Err(UrnError::Malformed(_))));
        assert!(matches!(Urn::parse("Fruit=TEST:FRUIT"), Err(UrnError::UnknownClass(_))));
        assert!(matches!(Urn::parse("Codelist=TEST:FRUIT(1.0)"), Err(UrnError::Version(_))));
        assert!(matches!(Urn::parse("Codelist=TEST"), Err(UrnError::Malformed(_))));
    }
}
