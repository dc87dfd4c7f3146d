mod common;

use bcf_core::{parse, FormatVersion, UNKNOWN_PROJECT_NAME};
use common::{
    extension_project, legacy_markup, modern_markup, project_info, topic_guid, ContainerBuilder,
};

#[test]
fn legacy_without_schema_is_oldest_generation() {
    let guid = topic_guid();
    let bytes = ContainerBuilder::declared("2.0")
        .entry("project.bcfp", extension_project("Depot", false))
        .topic_entry(&guid, "markup.bcf", legacy_markup(&guid, "Crack"))
        .build();

    let document = parse(&bytes, "depot.bcfzip").unwrap();
    assert_eq!(document.project.format_version, FormatVersion::Bcf20);
    assert_eq!(document.project.name, "Depot");
    assert!(!document.project.has_extension_schema);
    assert_eq!(document.topics[0].format_version, FormatVersion::Bcf20);
}

#[test]
fn legacy_with_schema_is_middle_generation() {
    let guid = topic_guid();
    let bytes = ContainerBuilder::declared("2.1")
        .entry("project.bcfp", extension_project("Tower", true))
        .topic_entry(&guid, "markup.bcf", legacy_markup(&guid, "Crack"))
        .build();

    let document = parse(&bytes, "tower.bcf").unwrap();
    assert_eq!(document.project.format_version, FormatVersion::Bcf21);
    assert_eq!(document.project.identifier, "p-legacy");
    assert!(document.project.has_extension_schema);
}

#[test]
fn modern_with_project_info_is_newest_generation() {
    let guid = topic_guid();
    let bytes = ContainerBuilder::declared("3.0")
        .entry("project.bcfp", project_info("Bridge"))
        .topic_entry(&guid, "markup.bcf", modern_markup(&guid, "Clash"))
        .build();

    let document = parse(&bytes, "bridge.bcf").unwrap();
    assert_eq!(document.project.format_version, FormatVersion::Bcf30);
    assert_eq!(document.project.name, "Bridge");
    assert_eq!(document.project.identifier, "p-modern");
    assert_eq!(document.topics[0].server_assigned_id, "ISSUE-7");
}

#[test]
fn declared_modern_with_extension_layout_is_demoted() {
    let guid = topic_guid();
    let bytes = ContainerBuilder::declared("3.0")
        .entry("project.bcfp", extension_project("Mislabelled", true))
        .topic_entry(&guid, "markup.bcf", modern_markup(&guid, "Clash"))
        .build();

    let document = parse(&bytes, "mislabelled.bcf").unwrap();
    assert_eq!(document.project.format_version, FormatVersion::Bcf21);
    assert_eq!(document.project.name, "Mislabelled");
    assert!(document.topics[0].server_assigned_id.is_empty());
}

#[test]
fn declared_modern_is_confirmed_by_documents_manifest() {
    let bytes = ContainerBuilder::declared("3.0")
        .entry(
            "documents.xml",
            r#"<DocumentInfo><Documents><Document Guid="d-1"><Filename>spec.pdf</Filename></Document></Documents></DocumentInfo>"#,
        )
        .build();

    let document = parse(&bytes, "docs.bcf").unwrap();
    assert_eq!(document.project.format_version, FormatVersion::Bcf30);
    assert_eq!(document.documents.len(), 1);
    assert_eq!(document.documents[0].filename, "spec.pdf");
    assert_eq!(document.project.name, UNKNOWN_PROJECT_NAME);
}

#[test]
fn declared_modern_is_confirmed_by_topic_markers() {
    let guid = topic_guid();
    let bytes = ContainerBuilder::declared("3.0")
        .topic_entry(&guid, "markup.bcf", modern_markup(&guid, "Clash"))
        .build();

    let document = parse(&bytes, "markers.bcf").unwrap();
    assert_eq!(document.project.format_version, FormatVersion::Bcf30);
    assert_eq!(document.topics[0].reference_links.len(), 2);
}

#[test]
fn unrecognized_version_without_evidence_defaults_to_middle_generation() {
    let bytes = ContainerBuilder::new()
        .entry("bcf.version", "<Version/>")
        .build();

    let document = parse(&bytes, "bare.bcf").unwrap();
    assert_eq!(document.project.format_version, FormatVersion::Bcf21);
    assert!(document.topics.is_empty());
}

#[test]
fn declared_legacy_without_project_document_is_oldest_generation() {
    let bytes = ContainerBuilder::declared("2.1").build();

    let document = parse(&bytes, "noproject.bcf").unwrap();
    assert_eq!(document.project.format_version, FormatVersion::Bcf20);
    assert!(document.project.is_unknown());
}
