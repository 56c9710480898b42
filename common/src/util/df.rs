use crate::types::dataset::{DataSet, Observation};
use polars::error::PolarsResult;
use polars::frame::DataFrame;
use polars::io::SerWriter;
use polars::prelude::{Column, CsvWriter};
use std::fs::File;
use std::path::Path;

pub const OBS_VALUE: &str = "OBS_VALUE";

/// Tabular form of a data set: one column per dimension (in order of first
/// appearance), then `OBS_VALUE`, then one column per attribute.
pub fn data_set_to_frame(data_set: &DataSet) -> PolarsResult<DataFrame> {
    let observations = &data_set.observations;

    let dimensions = column_ids(observations.iter().map(|obs| &obs.key));
    let attributes = column_ids(observations.iter().map(|obs| &obs.attributes));

    let lookup = |pairs: &Vec<(String, String)>, id: &str| -> Option<String> {
        pairs.iter().find(|(k, _)| k == id).map(|(_, v)| v.clone())
    };

    let mut columns = Vec::with_capacity(dimensions.len() + attributes.len() + 1);
    for dim in &dimensions {
        let values: Vec<Option<String>> = observations.iter().map(|obs| lookup(&obs.key, dim)).collect();
        columns.push(Column::new(dim.as_str().into(), &values));
    }

    let values: Vec<f64> = observations.iter().map(|obs: &Observation| obs.value).collect();
    columns.push(Column::new(OBS_VALUE.into(), &values));

    for attr in &attributes {
        let values: Vec<Option<String>> = observations.iter().map(|obs| lookup(&obs.attributes, attr)).collect();
        columns.push(Column::new(attr.as_str().into(), &values));
    }

    DataFrame::new(columns)
}

fn column_ids<'a>(rows: impl Iterator<Item = &'a Vec<(String, String)>>) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for (id, _) in rows.flatten() {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

pub fn write_csv(path: &Path, df: &mut DataFrame) -> PolarsResult<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(df)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::urn::Urn;

    #[test]
    fn test_data_set_to_frame() {
        let mut ds = DataSet::new(Urn::parse("Dataflow=TEST:MASS(1.0.0)").unwrap());
        ds.observations.push(Observation::new([("FRUIT", "APPLE"), ("COLOUR", "RED")], 1.5).with_attribute("UNIT", "kg"));
        ds.observations.push(Observation::new([("FRUIT", "LEMON"), ("COLOUR", "YELLOW")], 0.25));

        let frame = data_set_to_frame(&ds).unwrap();

        assert_eq!((2, 4), frame.shape());
        let names: Vec<String> = frame.get_column_names().into_iter().map(|n| n.to_string()).collect();
        assert_eq!(vec!["FRUIT", "COLOUR", OBS_VALUE, "UNIT"], names);
        assert_eq!(1, frame.column("UNIT").unwrap().null_count());
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DataSet_TEST_MASS_1-0-0.csv");

        let mut ds = DataSet::new(Urn::parse("Dataflow=TEST:MASS(1.0.0)").unwrap());
        ds.observations.push(Observation::new([("FRUIT", "APPLE")], 2.0));

        write_csv(&path, &mut data_set_to_frame(&ds).unwrap()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(Some("FRUIT,OBS_VALUE"), content.lines().next());
        assert!(content.lines().nth(1).unwrap().starts_with("APPLE,2"));
    }
}
