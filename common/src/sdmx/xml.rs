//! SDMX-ML shaped documents.
//!
//! Structures are written as a `Structure` message with one element list per
//! artefact class; (meta)data sets as a `GenericData` message. Only the subset of
//! SDMX-ML the store needs for a lossless round trip is represented.

use crate::sdmx::SdmxError;
use crate::types::artefact::{Annotation, ArtefactClass, Item, MaintainableArtefact, StructureMessage};
use crate::types::dataset::{DataSet, Observation, SetKind};
use crate::types::urn::Urn;
use crate::types::version::Version;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const HEADER_ID: &str = "TDC";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "Structure")]
struct StructureDocument {
    #[serde(rename = "Header")]
    header: Header,
    #[serde(rename = "Structures", default)]
    structures: Structures,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Prepared")]
    prepared: String,
}

impl Header {
    fn now() -> Self {
        Self {
            id: HEADER_ID.to_string(),
            prepared: chrono::Local::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Structures {
    #[serde(rename = "AgencyScheme", default, skip_serializing_if = "Vec::is_empty")]
    agency_schemes: Vec<ArtefactElement>,
    #[serde(rename = "Codelist", default, skip_serializing_if = "Vec::is_empty")]
    codelists: Vec<ArtefactElement>,
    #[serde(rename = "ConceptScheme", default, skip_serializing_if = "Vec::is_empty")]
    concept_schemes: Vec<ArtefactElement>,
    #[serde(rename = "Dataflow", default, skip_serializing_if = "Vec::is_empty")]
    dataflows: Vec<ArtefactElement>,
    #[serde(rename = "DataStructure", default, skip_serializing_if = "Vec::is_empty")]
    data_structures: Vec<ArtefactElement>,
    #[serde(rename = "MetadataStructure", default, skip_serializing_if = "Vec::is_empty")]
    metadata_structures: Vec<ArtefactElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ArtefactElement {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@agencyID")]
    agency_id: String,
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(rename = "@validFrom", default, skip_serializing_if = "Option::is_none")]
    valid_from: Option<String>,
    #[serde(rename = "Annotation", default, skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<AnnotationElement>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "Structure", default, skip_serializing_if = "Option::is_none")]
    structure: Option<Reference>,
    #[serde(rename = "Item", default, skip_serializing_if = "Vec::is_empty")]
    items: Vec<ItemElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnnotationElement {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "AnnotationTitle", default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(rename = "AnnotationText", default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemElement {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Reference {
    #[serde(rename = "@urn")]
    urn: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "GenericData")]
struct DataDocument {
    #[serde(rename = "Header")]
    header: Header,
    #[serde(rename = "DataSet", default)]
    data_sets: Vec<DataSetElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DataSetElement {
    #[serde(rename = "@structureRef")]
    structure_ref: String,
    #[serde(rename = "@metadata", default)]
    metadata: bool,
    #[serde(rename = "Annotation", default, skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<AnnotationElement>,
    #[serde(rename = "Obs", default, skip_serializing_if = "Vec::is_empty")]
    observations: Vec<ObsElement>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ObsElement {
    #[serde(rename = "@value")]
    value: f64,
    #[serde(rename = "Key", default)]
    key: Vec<ComponentValue>,
    #[serde(rename = "Attribute", default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<ComponentValue>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ComponentValue {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@value")]
    value: String,
}

/// Name of the root element of an XML document.
pub fn root_tag(content: &str) -> Result<String, SdmxError> {
    let mut reader = Reader::from_str(content);
    loop {
        match reader.read_event().map_err(|err| SdmxError::Xml(err.to_string()))? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::Eof => return Err(SdmxError::UnexpectedContent("empty document".to_string())),
            _ => {}
        }
    }
}

pub fn write_structures(message: &StructureMessage) -> Result<String, SdmxError> {
    let elements = |list: &Vec<MaintainableArtefact>| -> Vec<ArtefactElement> {
        list.iter().map(ArtefactElement::from).collect()
    };

    let document = StructureDocument {
        header: Header::now(),
        structures: Structures {
            agency_schemes: elements(&message.agency_scheme),
            codelists: elements(&message.codelist),
            concept_schemes: elements(&message.concept_scheme),
            dataflows: elements(&message.dataflow),
            data_structures: elements(&message.structure),
            metadata_structures: elements(&message.metadata_structure),
        },
    };

    serialize_pretty(&document)
}

pub fn read_structures(content: &str) -> Result<StructureMessage, SdmxError> {
    let document: StructureDocument =
        quick_xml::de::from_str(content).map_err(|err| SdmxError::Xml(err.to_string()))?;
    let s = document.structures;

    let mut message = StructureMessage::default();
    for (class, elements) in [
        (ArtefactClass::AgencyScheme, s.agency_schemes),
        (ArtefactClass::Codelist, s.codelists),
        (ArtefactClass::ConceptScheme, s.concept_schemes),
        (ArtefactClass::DataflowDefinition, s.dataflows),
        (ArtefactClass::DataStructureDefinition, s.data_structures),
        (ArtefactClass::MetadataStructureDefinition, s.metadata_structures),
    ] {
        for element in elements {
            message.add(element.into_artefact(class)?);
        }
    }

    Ok(message)
}

pub fn write_data(data_set: &DataSet) -> Result<String, SdmxError> {
    let document = DataDocument {
        header: Header::now(),
        data_sets: vec![DataSetElement::from(data_set)],
    };

    serialize_pretty(&document)
}

pub fn read_data(content: &str) -> Result<Vec<DataSet>, SdmxError> {
    let document: DataDocument =
        quick_xml::de::from_str(content).map_err(|err| SdmxError::Xml(err.to_string()))?;

    document.data_sets.into_iter().map(DataSetElement::into_data_set).collect()
}

fn serialize_pretty<T: Serialize>(value: &T) -> Result<String, SdmxError> {
    let mut buffer = String::from(XML_DECLARATION);
    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', 2);
    value
        .serialize(serializer)
        .map_err(|err| SdmxError::Xml(err.to_string()))?;
    buffer.push('\n');

    Ok(buffer)
}

impl From<&MaintainableArtefact> for ArtefactElement {
    fn from(value: &MaintainableArtefact) -> Self {
        Self {
            id: value.id.clone(),
            agency_id: value.maintainer.clone(),
            version: value.version.as_ref().map(Version::to_string),
            valid_from: value.valid_from.clone(),
            annotations: value.annotations.iter().map(AnnotationElement::from).collect(),
            name: value.name.clone(),
            description: value.description.clone(),
            structure: value.structure.as_ref().map(|urn| Reference { urn: urn.to_string() }),
            items: value
                .items
                .iter()
                .map(|item| ItemElement {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    description: item.description.clone(),
                })
                .collect(),
        }
    }
}

impl ArtefactElement {
    fn into_artefact(self, class: ArtefactClass) -> Result<MaintainableArtefact, SdmxError> {
        Ok(MaintainableArtefact {
            class,
            maintainer: self.agency_id,
            id: self.id,
            version: self.version.map(|v| v.parse::<Version>()).transpose()?,
            name: self.name,
            description: self.description,
            valid_from: self.valid_from,
            annotations: self.annotations.into_iter().map(Annotation::from).collect(),
            items: self
                .items
                .into_iter()
                .map(|item| Item {
                    id: item.id,
                    name: item.name,
                    description: item.description,
                })
                .collect(),
            structure: self.structure.map(|r| Urn::parse(&r.urn)).transpose()?,
        })
    }
}

impl From<&Annotation> for AnnotationElement {
    fn from(value: &Annotation) -> Self {
        Self {
            id: value.id.clone(),
            title: value.title.clone(),
            text: value.text.clone(),
        }
    }
}

impl From<AnnotationElement> for Annotation {
    fn from(value: AnnotationElement) -> Self {
        Self {
            id: value.id,
            title: value.title,
            text: value.text,
        }
    }
}

impl From<&DataSet> for DataSetElement {
    fn from(value: &DataSet) -> Self {
        let components = |pairs: &Vec<(String, String)>| -> Vec<ComponentValue> {
            pairs
                .iter()
                .map(|(id, value)| ComponentValue { id: id.clone(), value: value.clone() })
                .collect()
        };

        Self {
            structure_ref: value.described_by.to_string(),
            metadata: value.kind == SetKind::Metadata,
            annotations: value.annotations.iter().map(AnnotationElement::from).collect(),
            observations: value
                .observations
                .iter()
                .map(|obs| ObsElement {
                    value: obs.value,
                    key: components(&obs.key),
                    attributes: components(&obs.attributes),
                })
                .collect(),
        }
    }
}

impl DataSetElement {
    fn into_data_set(self) -> Result<DataSet, SdmxError> {
        let pairs = |values: Vec<ComponentValue>| -> Vec<(String, String)> {
            values.into_iter().map(|c| (c.id, c.value)).collect()
        };

        Ok(DataSet {
            kind: if self.metadata { SetKind::Metadata } else { SetKind::Data },
            described_by: Urn::parse(&self.structure_ref)?,
            annotations: self.annotations.into_iter().map(Annotation::from).collect(),
            observations: self
                .observations
                .into_iter()
                .map(|obs| Observation {
                    key: pairs(obs.key),
                    value: obs.value,
                    attributes: pairs(obs.attributes),
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> MaintainableArtefact {
        let mut cl = MaintainableArtefact::new(ArtefactClass::Codelist, "TEST", "FRUIT")
            .with_version(Version::new(1, 0, 0))
            .with_name("Type of fruit & vegetable")
            .with_items([Item::new("APPLE", "Apple"), Item::new("_T", "Total").with_description("All fruits")]);
        cl.annotations.push(Annotation {
            id: "tdc-generated".to_string(),
            title: None,
            text: Some("now".to_string()),
        });
        cl
    }

    #[test]
    fn test_structures() {
        let mut message = StructureMessage::default();
        message.add(fruit());
        let mut dfd = MaintainableArtefact::new(ArtefactClass::DataflowDefinition, "TEST", "MASS");
        dfd.structure = Some(Urn::parse("DataStructure=TEST:MASS(1.0.0)").unwrap());
        message.add(dfd);

        let xml = write_structures(&message).unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("<Codelist id=\"FRUIT\" agencyID=\"TEST\" version=\"1.0.0\">"));
        assert_eq!("Structure", root_tag(&xml).unwrap());

        assert_eq!(message, read_structures(&xml).unwrap());
    }

    #[test]
    fn test_data() {
        let mut ds = DataSet::new(Urn::parse("Dataflow=TEST:MASS(1.0.0)").unwrap());
        ds.observations.push(Observation::new([("FRUIT", "APPLE"), ("COLOUR", "RED")], 1.5).with_attribute("UNIT", "kg"));
        ds.observations.push(Observation::new([("FRUIT", "LEMON"), ("COLOUR", "YELLOW")], 0.25));

        let xml = write_data(&ds).unwrap();
        assert_eq!("GenericData", root_tag(&xml).unwrap());
        assert_eq!(vec![ds], read_data(&xml).unwrap());
    }
}
