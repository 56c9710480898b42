use crate::types::dataset::DataSet;
use crate::types::urn::Urn;
use crate::types::version::Version;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Kinds of artefact known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtefactClass {
    AgencyScheme,
    Codelist,
    ConceptScheme,
    DataStructureDefinition,
    DataflowDefinition,
    MetadataStructureDefinition,
    DataSet,
    MetadataSet,
}

impl ArtefactClass {
    pub const ALL: [ArtefactClass; 8] = [
        ArtefactClass::AgencyScheme,
        ArtefactClass::Codelist,
        ArtefactClass::ConceptScheme,
        ArtefactClass::DataStructureDefinition,
        ArtefactClass::DataflowDefinition,
        ArtefactClass::MetadataStructureDefinition,
        ArtefactClass::DataSet,
        ArtefactClass::MetadataSet,
    ];

    /// Class name as used in store file names.
    pub fn name(&self) -> &'static str {
        match self {
            ArtefactClass::AgencyScheme => "AgencyScheme",
            ArtefactClass::Codelist => "Codelist",
            ArtefactClass::ConceptScheme => "ConceptScheme",
            ArtefactClass::DataStructureDefinition => "DataStructureDefinition",
            ArtefactClass::DataflowDefinition => "DataflowDefinition",
            ArtefactClass::MetadataStructureDefinition => "MetadataStructureDefinition",
            ArtefactClass::DataSet => "DataSet",
            ArtefactClass::MetadataSet => "MetadataSet",
        }
    }

    /// Class name as used in URNs.
    pub fn urn_name(&self) -> &'static str {
        match self {
            ArtefactClass::DataStructureDefinition => "DataStructure",
            ArtefactClass::DataflowDefinition => "Dataflow",
            ArtefactClass::MetadataStructureDefinition => "MetadataStructure",
            other => other.name(),
        }
    }

    pub fn package(&self) -> &'static str {
        match self {
            ArtefactClass::AgencyScheme => "base",
            ArtefactClass::Codelist => "codelist",
            ArtefactClass::ConceptScheme => "conceptscheme",
            ArtefactClass::DataStructureDefinition
            | ArtefactClass::DataflowDefinition
            | ArtefactClass::DataSet => "datastructure",
            ArtefactClass::MetadataStructureDefinition | ArtefactClass::MetadataSet => "metadatastructure",
        }
    }

    /// Look up a class by either its file name or URN name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|class| class.name() == name || class.urn_name() == name)
    }

    /// Data and metadata sets take their identity from the structure describing them.
    pub fn is_maintainable(&self) -> bool {
        !matches!(self, ArtefactClass::DataSet | ArtefactClass::MetadataSet)
    }

    pub fn is_item_scheme(&self) -> bool {
        matches!(
            self,
            ArtefactClass::AgencyScheme | ArtefactClass::Codelist | ArtefactClass::ConceptScheme
        )
    }
}

impl Display for ArtefactClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub id: String,
    pub title: Option<String>,
    pub text: Option<String>,
}

impl Annotation {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(), title: None, text: None }
    }

    fn trim_text(&mut self) {
        trim(&mut self.title);
        trim(&mut self.text);
    }
}

/// Element text does not keep leading or trailing whitespace through SDMX-ML.
fn trim(value: &mut Option<String>) {
    if let Some(text) = value {
        if text.trim().len() != text.len() {
            *text = text.trim().to_string();
        }
    }
}

/// A member of an item scheme (code, concept, agency) or a structure component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Item {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "<{}: {}>", self.id, name),
            None => write!(f, "<{}>", self.id),
        }
    }
}

/// Any artefact carrying its own (class, maintainer, id, version).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintainableArtefact {
    pub class: ArtefactClass,
    pub maintainer: String,
    pub id: String,
    pub version: Option<Version>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub valid_from: Option<String>,
    pub annotations: Vec<Annotation>,
    pub items: Vec<Item>,
    /// For a dataflow: the data structure it uses.
    pub structure: Option<Urn>,
}

impl MaintainableArtefact {
    pub fn new(class: ArtefactClass, maintainer: &str, id: &str) -> Self {
        Self {
            class,
            maintainer: maintainer.to_string(),
            id: id.to_string(),
            version: None,
            name: None,
            description: None,
            valid_from: None,
            annotations: Vec::new(),
            items: Vec::new(),
            structure: None,
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn urn(&self) -> Urn {
        Urn::new(self.class, &self.maintainer, &self.id, self.version.clone())
    }

    pub fn get_annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Strip leading and trailing whitespace from names, descriptions and
    /// annotations, giving the form read back from a stored file.
    pub fn trim_text(&mut self) {
        trim(&mut self.name);
        trim(&mut self.description);
        self.annotations.iter_mut().for_each(Annotation::trim_text);
        for item in &mut self.items {
            trim(&mut item.name);
            trim(&mut item.description);
        }
    }
}

impl Display for MaintainableArtefact {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}", self.class, self.urn().shorten())?;
        if let Some(name) = &self.name {
            write!(f, ": {name}")?;
        }
        write!(f, ">")
    }
}

/// Anything the store can persist as a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum Artefact {
    Maintainable(MaintainableArtefact),
    DataSet(DataSet),
}

impl Artefact {
    /// Identity under which this artefact is stored.
    pub fn urn(&self) -> Urn {
        match self {
            Artefact::Maintainable(ma) => ma.urn(),
            Artefact::DataSet(ds) => ds.urn(),
        }
    }

    pub fn maintainer(&self) -> &str {
        match self {
            Artefact::Maintainable(ma) => &ma.maintainer,
            Artefact::DataSet(ds) => &ds.described_by.maintainer,
        }
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        match self {
            Artefact::Maintainable(ma) => &mut ma.annotations,
            Artefact::DataSet(ds) => &mut ds.annotations,
        }
    }

    /// See [MaintainableArtefact::trim_text].
    pub fn trim_text(&mut self) {
        match self {
            Artefact::Maintainable(ma) => ma.trim_text(),
            Artefact::DataSet(ds) => ds.annotations.iter_mut().for_each(Annotation::trim_text),
        }
    }

    pub fn as_maintainable(&self) -> Option<&MaintainableArtefact> {
        match self {
            Artefact::Maintainable(ma) => Some(ma),
            Artefact::DataSet(_) => None,
        }
    }

    pub fn into_maintainable(self) -> Option<MaintainableArtefact> {
        match self {
            Artefact::Maintainable(ma) => Some(ma),
            Artefact::DataSet(_) => None,
        }
    }
}

impl From<MaintainableArtefact> for Artefact {
    fn from(value: MaintainableArtefact) -> Self {
        Artefact::Maintainable(value)
    }
}

impl From<DataSet> for Artefact {
    fn from(value: DataSet) -> Self {
        Artefact::DataSet(value)
    }
}

/// A bundle of structures, categorised by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureMessage {
    pub agency_scheme: Vec<MaintainableArtefact>,
    pub codelist: Vec<MaintainableArtefact>,
    pub concept_scheme: Vec<MaintainableArtefact>,
    pub dataflow: Vec<MaintainableArtefact>,
    pub structure: Vec<MaintainableArtefact>,
    pub metadata_structure: Vec<MaintainableArtefact>,
}

impl StructureMessage {
    /// Add `artefact` to the list for its class. Data and metadata sets are not
    /// structures and are ignored.
    pub fn add(&mut self, artefact: MaintainableArtefact) {
        let list = match artefact.class {
            ArtefactClass::AgencyScheme => &mut self.agency_scheme,
            ArtefactClass::Codelist => &mut self.codelist,
            ArtefactClass::ConceptScheme => &mut self.concept_scheme,
            ArtefactClass::DataflowDefinition => &mut self.dataflow,
            ArtefactClass::DataStructureDefinition => &mut self.structure,
            ArtefactClass::MetadataStructureDefinition => &mut self.metadata_structure,
            ArtefactClass::DataSet | ArtefactClass::MetadataSet => return,
        };
        list.push(artefact);
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaintainableArtefact> {
        self.agency_scheme
            .iter()
            .chain(&self.codelist)
            .chain(&self.concept_scheme)
            .chain(&self.dataflow)
            .chain(&self.structure)
            .chain(&self.metadata_structure)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MaintainableArtefact> {
        self.agency_scheme
            .iter_mut()
            .chain(&mut self.codelist)
            .chain(&mut self.concept_scheme)
            .chain(&mut self.dataflow)
            .chain(&mut self.structure)
            .chain(&mut self.metadata_structure)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Find the artefact with the given identity, ignoring the version if `urn` has none.
    pub fn find(&self, urn: &Urn) -> Option<&MaintainableArtefact> {
        self.iter().find(|a| {
            a.class == urn.class
                && a.maintainer == urn.maintainer
                && a.id == urn.id
                && (urn.version.is_none() || a.version == urn.version)
        })
    }

    pub fn get(&self, class: ArtefactClass, id: &str) -> Option<&MaintainableArtefact> {
        self.iter().find(|a| a.class == class && a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names() {
        assert_eq!(Some(ArtefactClass::DataflowDefinition), ArtefactClass::from_name("Dataflow"));
        assert_eq!(Some(ArtefactClass::DataflowDefinition), ArtefactClass::from_name("DataflowDefinition"));
        assert_eq!(None, ArtefactClass::from_name("Dataset"));
        assert!(!ArtefactClass::MetadataSet.is_maintainable());
    }

    #[test]
    fn test_structure_message_find() {
        let mut sm = StructureMessage::default();
        sm.add(MaintainableArtefact::new(ArtefactClass::Codelist, "TEST", "FRUIT").with_version(Version::new(1, 0, 0)));
        sm.add(MaintainableArtefact::new(ArtefactClass::ConceptScheme, "TEST", "FRUIT").with_version(Version::new(1, 0, 0)));

        let urn = Urn::parse("Codelist=TEST:FRUIT").unwrap();
        assert_eq!(ArtefactClass::Codelist, sm.find(&urn).unwrap().class);
        assert!(sm.find(&urn.with_version(Some(Version::new(2, 0, 0)))).is_none());
        assert_eq!(2, sm.iter().count());
    }

    #[test]
    fn test_trim_text() {
        let mut cl = MaintainableArtefact::new(ArtefactClass::Codelist, "TEST", "FRUIT")
            .with_name("  padded  ")
            .with_items([Item::new("APPLE", "Apple\n").with_description(" a\n  b ")]);
        cl.annotations.push(Annotation { id: "note".to_string(), title: Some("".to_string()), text: Some(" x".to_string()) });

        let mut artefact = Artefact::from(cl);
        artefact.trim_text();

        let cl = artefact.into_maintainable().unwrap();
        assert_eq!(Some("padded".to_string()), cl.name);
        assert_eq!(Some("Apple".to_string()), cl.items[0].name);
        assert_eq!(Some("a\n  b".to_string()), cl.items[0].description);
        assert_eq!(Some("".to_string()), cl.annotations[0].title);
        assert_eq!(Some("x".to_string()), cl.annotations[0].text);
    }
}
