//! Structures maintained by the `TEST` agency, for use in tests.

use crate::types::artefact::{ArtefactClass, Item, MaintainableArtefact, StructureMessage};
use crate::types::version::Version;

pub const TEST_MAINTAINER: &str = "TEST";

fn test_artefact(class: ArtefactClass, id: &str) -> MaintainableArtefact {
    MaintainableArtefact::new(class, TEST_MAINTAINER, id).with_version(Version::new(1, 0, 0))
}

fn codes(ids: &[&str]) -> Vec<Item> {
    let mut items: Vec<Item> = ids
        .iter()
        .map(|id| {
            let mut name = id.to_lowercase();
            name[..1].make_ascii_uppercase();
            Item::new(id, &name)
        })
        .collect();
    items.push(Item::new("_T", "Total"));
    items
}

/// Concept scheme `TEST`, code lists `COLOUR` and `FRUIT`, data structures `MASS`
/// and `PICKED`, and dataflow `MASS`, all at version 1.0.0.
pub fn test_structures() -> StructureMessage {
    let mut message = StructureMessage::default();

    message.add(test_artefact(ArtefactClass::ConceptScheme, "TEST").with_items([
        Item::new("MASS", "Mass of fruit"),
        Item::new("PICKED", "Number of fruits picked"),
        Item::new("COLOUR", "Colour of fruit"),
        Item::new("FRUIT", "Type of fruit"),
    ]));

    message.add(
        test_artefact(ArtefactClass::Codelist, "COLOUR").with_items(codes(&["GREEN", "ORANGE", "RED", "YELLOW"])),
    );
    message.add(
        test_artefact(ArtefactClass::Codelist, "FRUIT").with_items(codes(&["APPLE", "BANANA", "GRAPE", "LEMON"])),
    );

    // Dimensions first, then the primary measure
    for (id, dims) in [("MASS", ["COLOUR", "FRUIT"]), ("PICKED", ["FRUIT", "COLOUR"])] {
        let components = dims
            .iter()
            .chain([&id])
            .map(|c| Item::new(c, c));
        message.add(test_artefact(ArtefactClass::DataStructureDefinition, id).with_items(components));
    }

    let mut dataflow = test_artefact(ArtefactClass::DataflowDefinition, "MASS").with_name("Mass of fruit");
    dataflow.structure = Some(test_artefact(ArtefactClass::DataStructureDefinition, "MASS").urn());
    message.add(dataflow);

    message
}
