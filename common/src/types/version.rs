use crate::types::errors::VersionError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A `major.minor.patch` artefact version.
///
/// Ordering is numeric per component, so `1.10.0` sorts after `1.9.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(semver::Version);

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Parse the version token embedded in a store file name, e.g. `1-10-0`.
    pub fn from_file_token(token: &str) -> Result<Self, VersionError> {
        token.replace('-', ".").parse()
    }

    /// The form of this version used in store file names, e.g. `1-10-0`.
    pub fn file_token(&self) -> String {
        self.to_string().replace('.', "-")
    }

    /// Bump the components selected by `increment`. Fails if a bumped component
    /// is already `u64::MAX`.
    pub fn increment(&self, increment: Increment) -> Result<Self, VersionError> {
        let bump = |component: u64| {
            component
                .checked_add(1)
                .ok_or_else(|| VersionError::Invalid(self.to_string(), "component overflow".to_string()))
        };

        let mut next = self.clone();
        if increment.major {
            next.0.major = bump(next.0.major)?;
        }
        if increment.minor {
            next.0.minor = bump(next.0.minor)?;
            next.0.patch = 0;
        }
        if increment.patch {
            next.0.patch = bump(next.0.patch)?;
        }
        Ok(next)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = semver::Version::parse(s)
            .map_err(|err| VersionError::Invalid(s.to_string(), err.to_string()))?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(VersionError::Invalid(
                s.to_string(),
                "pre-release and build metadata are not supported".to_string(),
            ));
        }

        Ok(Self(parsed))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which components of a [Version] to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Increment {
    pub major: bool,
    pub minor: bool,
    pub patch: bool,
}

impl Increment {
    pub const NONE: Increment = Increment { major: false, minor: false, patch: false };
    pub const MAJOR: Increment = Increment { major: true, minor: false, patch: false };
    pub const MINOR: Increment = Increment { major: false, minor: true, patch: false };
    pub const PATCH: Increment = Increment { major: false, minor: false, patch: true };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for Increment {
    fn default() -> Self {
        Self::MINOR
    }
}

// A bare flag bumps the major component
impl From<bool> for Increment {
    fn from(value: bool) -> Self {
        if value { Self::MAJOR } else { Self::NONE }
    }
}

impl From<(bool, bool, bool)> for Increment {
    fn from((major, minor, patch): (bool, bool, bool)) -> Self {
        Self { major, minor, patch }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ordering() {
        let mut versions: Vec<Version> = ["2.0.0", "1.10.0", "1.9.0"]
            .into_iter()
            .map(|v| v.parse().unwrap())
            .collect();
        versions.sort();

        let sorted: Vec<String> = versions.iter().map(Version::to_string).collect();
        assert_eq!(vec!["1.9.0", "1.10.0", "2.0.0"], sorted);
    }

    #[test]
    fn test_increment() {
        let v: Version = "1.2.3".parse().unwrap();

        assert_eq!(Version::new(1, 3, 0), v.increment(Increment::default()).unwrap());
        assert_eq!(Version::new(2, 2, 3), v.increment(Increment::MAJOR).unwrap());
        assert_eq!(Version::new(1, 2, 4), v.increment(Increment::PATCH).unwrap());
        assert_eq!(v, v.increment(Increment::NONE).unwrap());
        assert_eq!(Increment::MAJOR, Increment::from(true));
        assert_eq!(Increment::NONE, Increment::from(false));
    }

    #[test]
    fn test_increment_overflow() {
        let v = Version::from_file_token(&format!("1-{}-7", u64::MAX)).unwrap();

        assert!(v.increment(Increment::MINOR).is_err());
        assert_eq!(Version::new(2, u64::MAX, 7), v.increment(Increment::MAJOR).unwrap());
        assert_eq!(Version::new(1, u64::MAX, 8), v.increment(Increment::PATCH).unwrap());
    }

    #[test]
    fn test_file_token() {
        let v = Version::from_file_token("1-10-0").unwrap();
        assert_eq!(Version::new(1, 10, 0), v);
        assert_eq!("1-10-0", v.file_token());

        assert!(Version::from_file_token("1-0").is_err());
        assert!("1.0.0-rc1".parse::<Version>().is_err());
    }
}
