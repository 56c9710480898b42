//! Data providers known to TDC, and the agencies and structures each contributes.

use common::types::artefact::{ArtefactClass, Item};
use common::types::urn::Urn;
use log::warn;

pub trait Provider: Send + Sync {
    /// Short identifier, also the cache subdirectory for the provider's files.
    fn id(&self) -> &'static str;

    /// Agencies to include in the TDCI agency scheme.
    fn agencies(&self) -> Vec<Item>;

    /// Structures this provider maintains under the TDCI agency.
    fn provides(&self) -> Vec<Urn> {
        Vec::new()
    }
}

fn tdci_urn(class: ArtefactClass, id: &str) -> Urn {
    Urn::new(class, "TDCI", id, None)
}

/// Asian Transport Outlook.
pub struct Adb;

impl Provider for Adb {
    fn id(&self) -> &'static str {
        "ADB"
    }

    fn agencies(&self) -> Vec<Item> {
        vec![Item::new("ADB", "Asian Transport Outlook team at the Asian Development Bank")
            .with_description("See https://www.adb.org/what-we-do/topics/transport/asian-transport-outlook")]
    }

    fn provides(&self) -> Vec<Urn> {
        vec![
            tdci_urn(ArtefactClass::Codelist, "CL_ATO_ECONOMY"),
            tdci_urn(ArtefactClass::ConceptScheme, "CS_ATO_MEASURE"),
        ]
    }
}

/// JRC IDEES.
pub struct Jrc;

impl Provider for Jrc {
    fn id(&self) -> &'static str {
        "JRC"
    }

    fn agencies(&self) -> Vec<Item> {
        vec![Item::new("JRC", "Joint Research Centre of the European Commission")
            .with_description("See https://joint-research-centre.ec.europa.eu/index_en")]
    }
}

pub struct Oica;

impl Provider for Oica {
    fn id(&self) -> &'static str {
        "OICA"
    }

    fn agencies(&self) -> Vec<Item> {
        vec![Item::new("OICA", "International Organization of Motor Vehicle Manufacturers")
            .with_description("https://www.oica.net")]
    }
}

pub struct Itdp;

impl Provider for Itdp {
    fn id(&self) -> &'static str {
        "ITDP"
    }

    fn agencies(&self) -> Vec<Item> {
        vec![Item::new("ITDP", "Institute for Transportation and Development Policy")
            .with_description("https://itdp.org")]
    }
}

/// Providers registered explicitly at startup, in registration order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Adb);
        registry.register(Jrc);
        registry.register(Oica);
        registry.register(Itdp);
        registry
    }

    /// Add `provider`, replacing any provider registered earlier with the same id.
    pub fn register<P: Provider + 'static>(&mut self, provider: P) {
        if let Some(pos) = self.providers.iter().position(|p| p.id() == provider.id()) {
            warn!(target: "providers", "Replacing provider {}", provider.id());
            self.providers.remove(pos);
        }
        self.providers.push(Box::new(provider));
    }

    pub fn get(&self, id: &str) -> Option<&dyn Provider> {
        self.providers.iter().find(|p| p.id() == id).map(|p| p.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Provider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.iter().map(|p| p.id()).collect()
    }

    pub fn agencies(&self) -> Vec<Item> {
        self.iter().flat_map(|p| p.agencies()).collect()
    }

    pub fn provides(&self) -> Vec<Urn> {
        self.iter().flat_map(|p| p.provides()).collect()
    }
}
