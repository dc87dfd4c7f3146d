mod common;

use bcf_core::{parse, ParseError};
use common::{extension_project, legacy_markup, topic_guid, ContainerBuilder};

#[test]
fn missing_version_descriptor_is_fatal() {
    let guid = topic_guid();
    let bytes = ContainerBuilder::new()
        .entry("project.bcfp", extension_project("Depot", true))
        .topic_entry(&guid, "markup.bcf", legacy_markup(&guid, "Crack"))
        .build();

    let err = parse(&bytes, "broken.bcf").unwrap_err();
    assert!(matches!(err, ParseError::MissingVersionDescriptor));
    assert_eq!(err.code(), "missing_version_descriptor");
}

#[test]
fn bytes_that_are_not_a_zip_are_fatal() {
    let err = parse(b"definitely not a zip", "plain.txt").unwrap_err();
    assert!(matches!(err, ParseError::InvalidContainer(_)));
    assert!(err.to_string().contains("not a valid BCF container"));
}

#[test]
fn broken_topics_are_dropped_and_the_rest_survive() {
    let good = topic_guid();
    let malformed = topic_guid();
    let no_markup = topic_guid();
    let bad_viewpoint = topic_guid();

    let bytes = ContainerBuilder::declared("2.1")
        .entry("project.bcfp", extension_project("Depot", true))
        .topic_entry(&good, "markup.bcf", legacy_markup(&good, "Kept"))
        .topic_entry(&malformed, "markup.bcf", "<Markup><Topic>")
        .topic_entry(&no_markup, "snapshot.png", common::PNG_BYTES)
        .topic_entry(
            &bad_viewpoint,
            "markup.bcf",
            legacy_markup(&bad_viewpoint, "Bad camera"),
        )
        .topic_entry(&bad_viewpoint, "viewpoint.bcfv", "<VisualizationInfo>")
        .entry("not-a-guid/markup.bcf", legacy_markup("x", "Ignored"))
        .build();

    let document = parse(&bytes, "mixed.bcf").unwrap();
    assert_eq!(document.topics.len(), 1);
    assert_eq!(document.topics[0].identifier, good);
    assert_eq!(document.topics[0].title, "Kept");
}

#[test]
fn topic_markup_without_topic_element_is_dropped() {
    let guid = topic_guid();
    let bytes = ContainerBuilder::declared("2.1")
        .topic_entry(&guid, "markup.bcf", "<Markup><Header/></Markup>")
        .build();

    let document = parse(&bytes, "empty.bcf").unwrap();
    assert!(document.topics.is_empty());
}
