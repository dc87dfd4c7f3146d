mod common;

use bcf_core::{parse, FormatVersion};
use common::{extension_project, legacy_markup, modern_markup, project_info, topic_guid, ContainerBuilder};

#[test]
fn legacy_topic_fields_are_resolved() {
    let guid = topic_guid();
    let bytes = ContainerBuilder::declared("2.1")
        .entry("project.bcfp", extension_project("Depot", true))
        .topic_entry(&guid, "markup.bcf", legacy_markup(&guid, "Cracked wall"))
        .build();

    let document = parse(&bytes, "depot.bcf").unwrap();
    let topic = document.topic(&guid).unwrap();
    assert_eq!(topic.title, "Cracked wall");
    assert_eq!(topic.kind, "Issue");
    assert_eq!(topic.status, "Open");
    assert_eq!(topic.priority, "High");
    assert_eq!(topic.labels, vec!["Architecture"]);
    assert_eq!(topic.creation_author, "alice@example.com");
    assert_eq!(topic.reference_links, vec!["https://example.com/issue"]);
    assert!(topic.header_files.is_empty());
    assert!(topic.custom_fields.is_empty());
    assert!(document.custom_field_registry.is_empty());
}

#[test]
fn middle_generation_keeps_first_link_only() {
    let guid = topic_guid();
    let markup = format!(
        r#"<Markup>
             <Header><File><Filename>model.ifc</Filename></File></Header>
             <Topic Guid="{guid}">
               <Title>Links</Title>
               <ReferenceLink>https://example.com/first</ReferenceLink>
               <ReferenceLink>https://example.com/second</ReferenceLink>
               <DocumentReference Guid="d-1"><ReferencedDocument>spec.pdf</ReferencedDocument></DocumentReference>
             </Topic>
           </Markup>"#
    );
    let bytes = ContainerBuilder::declared("2.1")
        .entry("project.bcfp", extension_project("Depot", true))
        .topic_entry(&guid, "markup.bcf", markup)
        .build();

    let document = parse(&bytes, "links.bcf").unwrap();
    assert_eq!(document.project.format_version, FormatVersion::Bcf21);
    let topic = &document.topics[0];
    assert_eq!(topic.reference_links, vec!["https://example.com/first"]);
    assert!(topic.document_references.is_empty());
    assert!(topic.header_files.is_empty());
}

#[test]
fn modern_topic_reads_nested_lists() {
    let guid = topic_guid();
    let bytes = ContainerBuilder::declared("3.0")
        .entry("project.bcfp", project_info("Bridge"))
        .topic_entry(&guid, "markup.bcf", modern_markup(&guid, "Duct clash"))
        .build();

    let document = parse(&bytes, "bridge.bcf").unwrap();
    let topic = &document.topics[0];
    assert_eq!(topic.kind, "Clash");
    assert_eq!(topic.status, "Active");
    assert_eq!(topic.labels, vec!["MEP", "Level 3"]);
    assert_eq!(
        topic.reference_links,
        vec!["https://example.com/a", "https://example.com/b"]
    );
    assert_eq!(topic.comments.len(), 1);
    assert_eq!(topic.comments[0].text, "Moved duct.");
}

#[test]
fn tool_specific_aliases_fill_standard_fields() {
    let guid = topic_guid();
    let markup = format!(
        r#"<Markup><Topic Guid="{guid}">
             <Subject>Door swing</Subject>
             <Status>Closed</Status>
             <Category>Request</Category>
             <Severity>Low</Severity>
             <Details>Swing conflicts with wall.</Details>
             <CreatedBy>dan@example.com</CreatedBy>
             <Assignee>erin@example.com</Assignee>
             <Deadline>2024-12-31</Deadline>
           </Topic></Markup>"#
    );
    let bytes = ContainerBuilder::declared("2.1")
        .topic_entry(&guid, "markup.bcf", markup)
        .build();

    let topic = &parse(&bytes, "aliases.bcf").unwrap().topics[0];
    assert_eq!(topic.title, "Door swing");
    assert_eq!(topic.status, "Closed");
    assert_eq!(topic.kind, "Request");
    assert_eq!(topic.priority, "Low");
    assert_eq!(topic.description, "Swing conflicts with wall.");
    assert_eq!(topic.creation_author, "dan@example.com");
    assert_eq!(topic.assigned_to, "erin@example.com");
    assert_eq!(topic.due_date, "2024-12-31");
    assert!(topic.custom_fields.is_empty());
}

#[test]
fn alias_priority_follows_declared_order() {
    let guid = topic_guid();
    let markup = format!(
        r#"<Markup><Topic Guid="{guid}" Status="FromAttribute"><Name>third</Name><Title>first</Title><Subject>second</Subject><TopicStatus>FromElement</TopicStatus></Topic></Markup>"#
    );
    let bytes = ContainerBuilder::declared("2.1")
        .topic_entry(&guid, "markup.bcf", markup)
        .build();

    let topic = &parse(&bytes, "order.bcf").unwrap().topics[0];
    assert_eq!(topic.title, "first");
    assert_eq!(topic.status, "FromAttribute");
}

#[test]
fn topic_without_title_keeps_other_fields() {
    let guid = topic_guid();
    let markup = format!(
        r#"<Markup><Topic Guid="{guid}" TopicStatus="Open"><Priority>High</Priority></Topic></Markup>"#
    );
    let bytes = ContainerBuilder::declared("2.1")
        .topic_entry(&guid, "markup.bcf", markup)
        .build();

    let topic = &parse(&bytes, "untitled.bcf").unwrap().topics[0];
    assert!(topic.title.is_empty());
    assert_eq!(topic.status, "Open");
    assert_eq!(topic.priority, "High");
}

#[test]
fn single_unknown_child_yields_one_custom_field() {
    let guid = topic_guid();
    let markup = format!(
        r#"<Markup><Topic Guid="{guid}"><Title>t</Title><Foo>bar</Foo></Topic></Markup>"#
    );
    let bytes = ContainerBuilder::declared("2.1")
        .topic_entry(&guid, "markup.bcf", markup)
        .build();

    let document = parse(&bytes, "custom.bcf").unwrap();
    let fields = &document.topics[0].custom_fields;
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["topic_element_Foo"], "bar");
    assert_eq!(document.custom_field_registry.usage("topic_element_Foo"), 1);
}

#[test]
fn registry_counts_topics_and_comments() {
    let first = topic_guid();
    let second = topic_guid();
    let markup = |guid: &str| {
        format!(
            r#"<Markup>
                 <Topic Guid="{guid}" Origin="tool-x"><Title>t</Title></Topic>
                 <Comment Guid="c"><Comment>x</Comment><Mood>calm</Mood></Comment>
               </Markup>"#
        )
    };
    let bytes = ContainerBuilder::declared("2.1")
        .topic_entry(&first, "markup.bcf", markup(&first))
        .topic_entry(&second, "markup.bcf", markup(&second))
        .build();

    let document = parse(&bytes, "registry.bcf").unwrap();
    let registry = &document.custom_field_registry;
    assert_eq!(registry.usage("topic_attr_Origin"), 2);
    assert_eq!(registry.usage("comment_element_Mood"), 2);
    assert_eq!(registry.keys().count(), 2);
    assert_eq!(document.topics[0].comments[0].custom_fields["comment_element_Mood"], "calm");
}

#[test]
fn vendor_namespace_elements_are_reported() {
    let guid = topic_guid();
    let markup = format!(
        r#"<Markup xmlns:acme="urn:acme"><Topic Guid="{guid}"><Title>t</Title><acme:Zone>North</acme:Zone></Topic></Markup>"#
    );
    let bytes = ContainerBuilder::declared("2.1")
        .topic_entry(&guid, "markup.bcf", markup)
        .build();

    let fields = &parse(&bytes, "vendor.bcf").unwrap().topics[0].custom_fields;
    assert_eq!(fields["namespace_urn:acme_Zone"], "North");
    assert_eq!(fields["topic_element_Zone"], "North");
}

#[test]
fn topics_are_ordered_by_folder_name() {
    let mut guids = vec![topic_guid(), topic_guid(), topic_guid()];
    let mut builder = ContainerBuilder::declared("2.1");
    for guid in &guids {
        builder = builder.topic_entry(guid, "markup.bcf", legacy_markup(guid, guid));
    }
    let document = parse(&builder.build(), "ordered.bcf").unwrap();

    guids.sort();
    let identifiers: Vec<&str> = document
        .topics
        .iter()
        .map(|topic| topic.identifier.as_str())
        .collect();
    assert_eq!(identifiers, guids);
}
