use crate::base::BaseStore;
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Unversioned per-user cache. Default destination for maintainers without a
/// registry mapping.
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open the store at `root`, creating the directory (and parents) if needed.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(target: "store", "Local store at {}", root.display());

        Ok(Self { root })
    }
}

impl BaseStore for LocalStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn label(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::WriteOptions;
    use crate::errors::StoreError;
    use common::types::artefact::{Artefact, ArtefactClass, Item, MaintainableArtefact, StructureMessage};
    use common::types::dataset::{DataSet, Observation};
    use common::types::urn::Urn;
    use common::types::version::{Increment, Version};

    fn codelist(version: Version) -> MaintainableArtefact {
        MaintainableArtefact::new(ArtefactClass::Codelist, "TEST", "FRUIT")
            .with_version(version)
            .with_name("Type of fruit")
            .with_items(["APPLE", "BANANA", "GRAPE", "LEMON"].map(|id| Item::new(id, &id[..1])))
    }

    #[test]
    fn test_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a").join("local");

        let store = LocalStore::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(root.as_path(), store.root());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let mut artefact: Artefact = codelist(Version::new(1, 0, 0)).into();
        let path = store.write(&mut artefact, WriteOptions::default()).unwrap();
        assert!(path.ends_with("TEST/Codelist_TEST_FRUIT_1-0-0.xml"));

        let read = store.get(&artefact.urn()).unwrap();
        assert_eq!(artefact, read);
        assert!(read.as_maintainable().unwrap().get_annotation("tdc-generated").is_some());
    }

    #[test]
    fn test_round_trip_padded_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let mut cl = codelist(Version::new(1, 0, 0)).with_name("  padded  ");
        cl.items[0].description = Some("\n  Malus domestica\n".to_string());
        let mut artefact: Artefact = cl.into();
        store.write(&mut artefact, WriteOptions::default()).unwrap();

        let read = store.get(&artefact.urn()).unwrap();
        assert_eq!(artefact, read);
        let read = read.into_maintainable().unwrap();
        assert_eq!(Some("padded".to_string()), read.name);
        assert_eq!(Some("Malus domestica".to_string()), read.items[0].description);
    }

    #[test]
    fn test_no_silent_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let mut first: Artefact = codelist(Version::new(1, 0, 0)).into();
        store.write(&mut first, WriteOptions::default()).unwrap();

        let mut second = codelist(Version::new(1, 0, 0)).with_name("Fruit, revised");
        second.items.truncate(2);
        let mut second: Artefact = second.into();

        let result = store.write(&mut second, WriteOptions::default());
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        assert_eq!(first, store.get(&first.urn()).unwrap());

        store.write(&mut second, WriteOptions::default().with_force(true)).unwrap();
        let read = store.get(&second.urn()).unwrap().into_maintainable().unwrap();
        assert_eq!(Some("Fruit, revised".to_string()), read.name);
        assert_eq!(2, read.items.len());
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let urn = Urn::parse("Codelist=TEST:MISSING(1.0.0)").unwrap();
        assert!(store.get(&urn).unwrap_err().is_not_found());
        assert!(store.list_versions(&urn).unwrap().is_empty());
        assert!(store.list("TEST").unwrap().is_empty());
    }

    #[test]
    fn test_list_versions_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        for v in ["2.0.0", "1.10.0", "1.9.0"] {
            let mut a: Artefact = codelist(v.parse().unwrap()).into();
            store.write(&mut a, WriteOptions::default()).unwrap();
        }

        let urn = Urn::parse("Codelist=TEST:FRUIT").unwrap();
        let versions: Vec<String> = store.list_versions(&urn).unwrap().iter().map(Version::to_string).collect();
        assert_eq!(vec!["1.9.0", "1.10.0", "2.0.0"], versions);
    }

    #[test]
    fn test_malformed_version_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        fs::create_dir(dir.path().join("TEST")).unwrap();
        fs::write(dir.path().join("TEST").join("Codelist_TEST_FRUIT_1-0.xml"), "").unwrap();

        let urn = Urn::parse("Codelist=TEST:FRUIT").unwrap();
        assert!(matches!(store.list_versions(&urn), Err(StoreError::Integrity(_))));
    }

    #[test]
    fn test_list_versions_skips_unversioned_neighbour() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let mut a: Artefact = codelist(Version::new(1, 0, 0)).into();
        store.write(&mut a, WriteOptions::default()).unwrap();
        let mut neighbour: Artefact = MaintainableArtefact::new(ArtefactClass::Codelist, "TEST", "FRUIT_2020").into();
        store.write(&mut neighbour, WriteOptions::default()).unwrap();

        assert_eq!(2, store.list("TEST").unwrap().len());
        let urn = Urn::parse("Codelist=TEST:FRUIT").unwrap();
        assert_eq!(vec![Version::new(1, 0, 0)], store.list_versions(&urn).unwrap());
    }

    #[test]
    fn test_next_version_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let mut a: Artefact = codelist(Version::new(1, u64::MAX, 0)).into();
        store.write(&mut a, WriteOptions::default()).unwrap();

        let urn = a.urn();
        assert!(matches!(store.next_version(&urn, Increment::MINOR), Err(StoreError::Version(_))));
        assert_eq!(Version::new(2, u64::MAX, 0), store.next_version(&urn, Increment::MAJOR).unwrap());
    }

    #[test]
    fn test_write_structures_keeps_earlier_members() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let colour = MaintainableArtefact::new(ArtefactClass::Codelist, "TEST", "COLOUR")
            .with_version(Version::new(1, 0, 0))
            .with_items([Item::new("RED", "Red")]);
        store.write(&mut Artefact::from(colour.clone()), WriteOptions::default()).unwrap();

        let mut message = StructureMessage::default();
        message.add(codelist(Version::new(1, 0, 0)));
        message.add(colour.clone().with_name("Colour, revised"));

        let result = store.write_structures(&mut message, WriteOptions::default());
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));

        // FRUIT was written before COLOUR failed, and COLOUR is unchanged
        let fruit = store.get(&Urn::parse("Codelist=TEST:FRUIT(1.0.0)").unwrap()).unwrap();
        assert_eq!(4, fruit.as_maintainable().unwrap().items.len());
        let stored = store.get(&colour.urn()).unwrap().into_maintainable().unwrap();
        assert_eq!(None, stored.name);
    }

    #[test]
    fn test_version_assignment() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let mut fresh = MaintainableArtefact::new(ArtefactClass::Codelist, "TEST", "FRUIT");
        store.assign_version(&mut fresh, Version::new(0, 0, 0), Increment::NONE).unwrap();
        assert_eq!(Some(Version::new(0, 0, 0)), fresh.version);
        assert!(matches!(
            store.next_version(&fresh.urn(), Increment::default()),
            Err(StoreError::NoVersions(_))
        ));

        let mut a: Artefact = codelist(Version::new(1, 2, 3)).into();
        store.write(&mut a, WriteOptions::default()).unwrap();

        let urn = a.urn();
        assert_eq!(Version::new(1, 3, 0), store.next_version(&urn, Increment::default()).unwrap());
        assert_eq!(Version::new(2, 2, 3), store.next_version(&urn, (true, false, false).into()).unwrap());

        store.assign_version(&mut fresh, Version::new(0, 0, 0), Increment::NONE).unwrap();
        assert_eq!(Some(Version::new(1, 2, 3)), fresh.version);
    }

    #[test]
    fn test_data_set_writes_csv_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let mut ds = DataSet::new(Urn::parse("Dataflow=TEST:MASS(1.0.0)").unwrap());
        ds.observations.push(Observation::new([("FRUIT", "APPLE"), ("COLOUR", "RED")], 1.5));
        let mut artefact: Artefact = ds.into();

        let path = store.write(&mut artefact, WriteOptions::default()).unwrap();
        assert!(path.ends_with("TEST/DataSet_TEST_MASS_1-0-0.xml"));
        assert!(path.with_extension("csv").exists());

        assert_eq!(artefact, store.get(&artefact.urn()).unwrap());
        assert_eq!(vec![artefact.urn()], store.list("TEST").unwrap());
    }

    #[test]
    fn test_wrong_content_is_integrity_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let mut a: Artefact = codelist(Version::new(1, 0, 0)).into();
        let path = store.write(&mut a, WriteOptions::default()).unwrap();

        // A file named for another artefact, holding FRUIT
        let other = Urn::parse("Codelist=TEST:COLOUR(1.0.0)").unwrap();
        fs::copy(&path, store.path_for_urn(&other)).unwrap();

        assert!(matches!(store.get(&other), Err(StoreError::Integrity(_))));
    }
}
