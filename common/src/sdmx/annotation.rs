use crate::types::artefact::Annotation;

pub const GENERATED_ANNOTATION_ID: &str = "tdc-generated";

/// Record in `annotations` when and by what the owning artefact was generated.
///
/// An existing `tdc-generated` annotation is updated in place.
pub fn anno_generated(annotations: &mut Vec<Annotation>) {
    let text = format!(
        "{} by tdc v{}",
        chrono::Local::now().to_rfc3339(),
        env!("CARGO_PKG_VERSION")
    );

    match annotations.iter_mut().find(|a| a.id == GENERATED_ANNOTATION_ID) {
        Some(anno) => anno.text = Some(text),
        None => {
            let mut anno = Annotation::new(GENERATED_ANNOTATION_ID);
            anno.text = Some(text);
            annotations.push(anno);
        }
    }
}
