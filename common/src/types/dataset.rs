use crate::types::artefact::{Annotation, ArtefactClass};
use crate::types::urn::Urn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    Data,
    Metadata,
}

impl SetKind {
    pub fn class(&self) -> ArtefactClass {
        match self {
            SetKind::Data => ArtefactClass::DataSet,
            SetKind::Metadata => ArtefactClass::MetadataSet,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// (dimension id, value) pairs, in dimension order
    pub key: Vec<(String, String)>,
    pub value: f64,
    pub attributes: Vec<(String, String)>,
}

impl Observation {
    pub fn new<K, V>(key: impl IntoIterator<Item = (K, V)>, value: f64) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            value,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, id: &str, value: &str) -> Self {
        self.attributes.push((id.to_string(), value.to_string()));
        self
    }
}

/// A (meta)data set. It has no identity of its own: it is stored under the
/// identity of the dataflow or structure that describes it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    pub kind: SetKind,
    pub described_by: Urn,
    pub annotations: Vec<Annotation>,
    pub observations: Vec<Observation>,
}

impl DataSet {
    pub fn new(described_by: Urn) -> Self {
        Self {
            kind: SetKind::Data,
            described_by,
            annotations: Vec::new(),
            observations: Vec::new(),
        }
    }

    pub fn metadata(described_by: Urn) -> Self {
        Self { kind: SetKind::Metadata, ..Self::new(described_by) }
    }

    pub fn urn(&self) -> Urn {
        self.described_by.with_class(self.kind.class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_derived_from_dataflow() {
        let dfd = Urn::parse("Dataflow=TEST:MASS(1.0.0)").unwrap();
        let ds = DataSet::new(dfd.clone());

        let urn = ds.urn();
        assert_eq!(ArtefactClass::DataSet, urn.class);
        assert!(urn.with_class(dfd.class) == dfd);
    }
}
