//! Reading and writing artefacts: SDMX-ML for the canonical representation and
//! CSV as a secondary, tabular rendering of data sets.

pub mod annotation;
pub mod xml;

use crate::types::artefact::{Artefact, StructureMessage};
use crate::types::dataset::DataSet;
use crate::types::errors::{UrnError, VersionError};
use crate::util::df;
use polars::error::PolarsError;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::{fmt, io};

/// Contents of one SDMX-ML file.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Structure(StructureMessage),
    Data(Vec<DataSet>),
}

pub fn to_xml(artefact: &Artefact) -> Result<String, SdmxError> {
    match artefact {
        Artefact::Maintainable(ma) => {
            let mut message = StructureMessage::default();
            message.add(ma.clone());
            xml::write_structures(&message)
        }
        Artefact::DataSet(ds) => xml::write_data(ds),
    }
}

pub fn write_xml(artefact: &Artefact, path: &Path) -> Result<(), SdmxError> {
    fs::write(path, to_xml(artefact)?)?;
    Ok(())
}

pub fn read_xml(path: &Path) -> Result<Message, SdmxError> {
    let content = fs::read_to_string(path)?;

    match xml::root_tag(&content)?.as_str() {
        "Structure" => Ok(Message::Structure(xml::read_structures(&content)?)),
        "GenericData" => Ok(Message::Data(xml::read_data(&content)?)),
        other => Err(SdmxError::UnexpectedContent(format!("root element <{other}> in {path:?}"))),
    }
}

/// Write the observations of `data_set` as CSV.
pub fn write_csv(data_set: &DataSet, path: &Path) -> Result<(), SdmxError> {
    let mut frame = df::data_set_to_frame(data_set)?;
    df::write_csv(path, &mut frame)?;
    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum SdmxError {
    Xml(String),
    UnexpectedContent(String),
    IO(#[from] io::Error),
    Polars(#[from] PolarsError),
    Urn(#[from] UrnError),
    Version(#[from] VersionError),
}

impl Display for SdmxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SdmxError::Xml(err) => write!(f, "XML error: {err}"),
            SdmxError::UnexpectedContent(what) => write!(f, "Unexpected content: {what}"),
            SdmxError::IO(err) => write!(f, "{err}"),
            SdmxError::Polars(err) => write!(f, "{err}"),
            SdmxError::Urn(err) => write!(f, "{err}"),
            SdmxError::Version(err) => write!(f, "{err}"),
        }
    }
}
