pub mod artefact;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod urn;
pub mod version;
