use crate::base::{BaseStore, WriteOptions};
use crate::errors::{StoreError, StoreResult};
use crate::local::LocalStore;
use crate::registry::Registry;
use common::types::artefact::{Artefact, MaintainableArtefact, StructureMessage};
use common::types::config::{Config, StoreName};
use common::types::urn::Urn;
use common::types::version::{Increment, Version};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Routes each artefact to the local store or the registry according to its
/// maintainer.
#[derive(Debug)]
pub struct UnionStore {
    local: LocalStore,
    registry: Registry,
    store_map: BTreeMap<String, StoreName>,
}

impl UnionStore {
    pub fn new(config: &Config) -> StoreResult<Self> {
        Ok(Self::from_parts(
            LocalStore::new(config.local_path())?,
            Registry::new(config.registry_path(), &config.registry_remote_url),
            config.store.clone(),
        ))
    }

    pub fn from_parts(local: LocalStore, registry: Registry, store_map: BTreeMap<String, StoreName>) -> Self {
        Self { local, registry, store_map }
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self, name: StoreName) -> &dyn BaseStore {
        match name {
            StoreName::Local => &self.local,
            StoreName::Registry => &self.registry,
        }
    }

    /// Name of the sub-store for `maintainer`; unmapped maintainers use the local store.
    pub fn store_name_for(&self, maintainer: &str) -> StoreName {
        self.store_map.get(maintainer).copied().unwrap_or_default()
    }

    pub fn store_for(&self, maintainer: &str) -> &dyn BaseStore {
        self.store(self.store_name_for(maintainer))
    }

    /// Return an artefact given a short or long, possibly partial, URN.
    ///
    /// Without a version in `key`, the greatest stored version is returned.
    pub fn get(&self, key: &str) -> StoreResult<Artefact> {
        let urn = Urn::parse(key)?;
        self.get_urn(&self.resolve_latest(urn)?)
    }

    pub fn get_urn(&self, urn: &Urn) -> StoreResult<Artefact> {
        let primary = self.store_name_for(&urn.maintainer);

        match self.store(primary).get(urn) {
            Err(StoreError::NotFound(_)) => {
                let fallback = match primary {
                    StoreName::Local => StoreName::Registry,
                    StoreName::Registry => StoreName::Local,
                };
                debug!(target: "store", "{} not in {} store; trying {}", urn.shorten(), primary, fallback);
                self.store(fallback).get(urn)
            }
            result => result,
        }
    }

    fn resolve_latest(&self, urn: Urn) -> StoreResult<Urn> {
        if urn.version.is_some() {
            return Ok(urn);
        }

        match self.list_versions(&urn)?.pop() {
            Some(latest) => Ok(urn.with_version(Some(latest))),
            None => Ok(urn),
        }
    }

    pub fn write(&self, artefact: &mut Artefact, options: WriteOptions) -> StoreResult<PathBuf> {
        self.store_for(artefact.maintainer()).write(artefact, options)
    }

    /// Store `artefact` with default [WriteOptions].
    pub fn set(&self, artefact: &mut Artefact) -> StoreResult<PathBuf> {
        self.write(artefact, WriteOptions::default())
    }

    /// Write each artefact in `message` to the store for its maintainer.
    pub fn write_structures(
        &self,
        message: &mut StructureMessage,
        options: WriteOptions,
    ) -> StoreResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for ma in message.iter_mut() {
            let mut artefact = Artefact::Maintainable(ma.clone());
            paths.push(self.write(&mut artefact, options)?);
            if let Artefact::Maintainable(written) = artefact {
                *ma = written;
            }
        }
        Ok(paths)
    }

    /// URNs stored for `maintainer` in either sub-store, without duplicates.
    pub fn list(&self, maintainer: &str) -> StoreResult<Vec<Urn>> {
        let mut urns = BTreeSet::new();
        urns.extend(self.local.list(maintainer)?);
        urns.extend(self.registry.list(maintainer)?);

        Ok(urns.into_iter().collect())
    }

    /// Versions of `urn` stored in either sub-store, ascending.
    pub fn list_versions(&self, urn: &Urn) -> StoreResult<Vec<Version>> {
        let mut versions = BTreeSet::new();
        versions.extend(self.local.list_versions(urn)?);
        versions.extend(self.registry.list_versions(urn)?);

        Ok(versions.into_iter().collect())
    }

    pub fn next_version(&self, urn: &Urn, increment: Increment) -> StoreResult<Version> {
        self.store_for(&urn.maintainer).next_version(urn, increment)
    }

    pub fn assign_version(
        &self,
        artefact: &mut MaintainableArtefact,
        default: Version,
        increment: Increment,
    ) -> StoreResult<()> {
        self.store_for(&artefact.maintainer)
            .assign_version(artefact, default, increment)
    }

    /// Copy the artefact for `key` from the local store into the registry.
    pub fn add_to_registry(&self, key: &str) -> StoreResult<PathBuf> {
        let mut urn = Urn::parse(key)?;
        if urn.version.is_none() {
            if let Some(latest) = self.local.list_versions(&urn)?.pop() {
                urn = urn.with_version(Some(latest));
            }
        }

        let mut artefact = self.local.get(&urn)?;
        let path = self.registry.write(&mut artefact, WriteOptions::default())?;
        info!(target: "store", "Added {} to the registry", urn.shorten());

        Ok(path)
    }

    pub fn clone_registry(&self) -> StoreResult<()> {
        self.registry.clone_remote()
    }
}
