//! Information about the Transport Data Commons Initiative itself.

use crate::providers::ProviderRegistry;
use common::types::artefact::{Artefact, ArtefactClass, Item, MaintainableArtefact};
use common::types::version::{Increment, Version};
use log::info;
use store::{StoreError, StoreResult, UnionStore, WriteOptions};

pub const TDCI: &str = "TDCI";

pub fn agency() -> Item {
    Item::new(TDCI, "Transport Data Commons Initiative").with_description("See https://transport-data.org")
}

/// `AgencyScheme=TDCI:TDCI`: TDCI and the agencies of every registered provider.
/// The version is left unset.
pub fn agency_scheme(providers: &ProviderRegistry) -> MaintainableArtefact {
    let mut scheme = MaintainableArtefact::new(ArtefactClass::AgencyScheme, TDCI, TDCI)
        .with_name("Transport Data Commons Initiative partners and participants")
        .with_items([agency()])
        .with_items(providers.agencies());
    scheme.valid_from = Some(chrono::Local::now().date_naive().to_string());
    scheme
}

/// Regenerate the TDCI agency scheme and write it to `store`.
///
/// Without an increment the latest stored version is overwritten.
pub fn refresh(store: &UnionStore, providers: &ProviderRegistry, increment: Increment) -> StoreResult<Artefact> {
    let default = Version::new(0, 1, 0);
    let mut scheme = agency_scheme(providers);

    match store.assign_version(&mut scheme, default.clone(), increment) {
        Err(StoreError::NoVersions(_)) => scheme.version = Some(default),
        result => result?,
    }

    let mut artefact = Artefact::from(scheme);
    store.write(&mut artefact, WriteOptions::default().with_force(increment.is_none()))?;
    info!(target: "org", "Refreshed {}", artefact.urn().shorten());

    Ok(artefact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::config::{Config, StoreName};

    fn local_store(root: &std::path::Path) -> UnionStore {
        let mut config = Config::rooted_at(root);
        config.store.insert(TDCI.to_string(), StoreName::Local);
        UnionStore::new(&config).unwrap()
    }

    #[test]
    fn test_agency_scheme() {
        let scheme = agency_scheme(&ProviderRegistry::with_builtin());

        assert_eq!("AgencyScheme=TDCI:TDCI", scheme.urn().shorten());
        let ids: Vec<&str> = scheme.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(vec!["TDCI", "ADB", "JRC", "OICA", "ITDP"], ids);
        assert!(scheme.valid_from.is_some());
    }

    #[test]
    fn test_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(dir.path());
        let providers = ProviderRegistry::with_builtin();

        let first = refresh(&store, &providers, Increment::NONE).unwrap();
        assert_eq!(Some(Version::new(0, 1, 0)), first.urn().version);

        // Rewritten in place
        refresh(&store, &providers, Increment::NONE).unwrap();
        let urn = first.urn();
        assert_eq!(vec![Version::new(0, 1, 0)], store.list_versions(&urn).unwrap());

        refresh(&store, &providers, Increment::MINOR).unwrap();
        assert_eq!(
            vec![Version::new(0, 1, 0), Version::new(0, 2, 0)],
            store.list_versions(&urn).unwrap()
        );

        let latest = store.get("AgencyScheme=TDCI:TDCI").unwrap();
        assert_eq!(Some(Version::new(0, 2, 0)), latest.urn().version);
        assert_eq!(5, latest.as_maintainable().unwrap().items.len());
    }

    #[test]
    fn test_refresh_with_increment_on_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(dir.path());

        let scheme = refresh(&store, &ProviderRegistry::new(), Increment::MAJOR).unwrap();

        assert_eq!(Some(Version::new(0, 1, 0)), scheme.urn().version);
        assert_eq!(1, scheme.as_maintainable().unwrap().items.len());
    }
}
