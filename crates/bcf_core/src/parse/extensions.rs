//! Extension vocabulary parsing.
//!
//! Reads `extensions.xml` (list form) or, failing that, `extensions.xsd`
//! (schema enumeration form). Absent or empty vocabularies yield `None`.

use crate::archive::{ContainerArchive, EXTENSIONS_XML_ENTRY, EXTENSIONS_XSD_ENTRY};
use crate::model::document::ExtensionsDefinition;
use crate::xml::{attribute_text, child_elements, element_text, find_descendant, has_name, parse_document};
use log::{debug, warn};
use roxmltree::Node;

/// `(list container, item)` pairs of the list form, in field order.
const LIST_LAYOUT: [(&str, &str); 7] = [
    ("TopicTypes", "TopicType"),
    ("TopicStatuses", "TopicStatus"),
    ("Priorities", "Priority"),
    ("TopicLabels", "TopicLabel"),
    ("Users", "User"),
    ("SnippetTypes", "SnippetType"),
    ("Stages", "Stage"),
];

/// `simpleType` names of the schema form, in field order.
const SCHEMA_TYPES: [&str; 7] = [
    "TopicType",
    "TopicStatus",
    "Priority",
    "TopicLabel",
    "UserIdType",
    "SnippetType",
    "Stage",
];

pub fn parse_extensions(archive: &ContainerArchive) -> Option<ExtensionsDefinition> {
    let definition = if let Some(text) = archive.read_optional_text(EXTENSIONS_XML_ENTRY) {
        read_with(&text, EXTENSIONS_XML_ENTRY, |root| {
            LIST_LAYOUT.map(|(container, item)| {
                find_descendant(root, container)
                    .map(|list| child_elements(list, item).filter_map(element_text).collect())
                    .unwrap_or_default()
            })
        })?
    } else if let Some(text) = archive.read_optional_text(EXTENSIONS_XSD_ENTRY) {
        read_with(&text, EXTENSIONS_XSD_ENTRY, |root| {
            SCHEMA_TYPES.map(|name| schema_enumeration(root, name))
        })?
    } else {
        return None;
    };

    if definition.is_empty() {
        debug!("event=extensions_parse module=parse status=empty");
        return None;
    }
    Some(definition)
}

fn read_with<F>(text: &str, path: &str, read: F) -> Option<ExtensionsDefinition>
where
    F: FnOnce(Node<'_, '_>) -> [Vec<String>; 7],
{
    let doc = match parse_document(text) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(
                "event=extensions_parse module=parse status=skipped path={} error={}",
                path, err
            );
            return None;
        }
    };
    let [topic_types, topic_statuses, priorities, topic_labels, users, snippet_types, stages] =
        read(doc.root_element());
    Some(ExtensionsDefinition {
        topic_types,
        topic_statuses,
        priorities,
        topic_labels,
        users,
        snippet_types,
        stages,
    })
}

/// Enumeration values of the named `simpleType`.
fn schema_enumeration(root: Node<'_, '_>, type_name: &str) -> Vec<String> {
    root.descendants()
        .filter(|node| {
            has_name(*node, "simpleType") && node.attribute("name") == Some(type_name)
        })
        .flat_map(|simple_type| {
            simple_type
                .descendants()
                .filter(|node| has_name(*node, "enumeration"))
                .filter_map(|node| attribute_text(node, "value"))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_extensions;
    use crate::archive::ContainerArchive;

    #[test]
    fn list_form_is_read() {
        let archive = ContainerArchive::from_entries(vec![(
            "extensions.xml",
            br#"<Extensions>
                 <TopicTypes><TopicType>Clash</TopicType><TopicType>Issue</TopicType></TopicTypes>
                 <Users><User>a@b.c</User></Users>
               </Extensions>"#
                .to_vec(),
        )]);
        let extensions = parse_extensions(&archive).unwrap();
        assert_eq!(extensions.topic_types, vec!["Clash", "Issue"]);
        assert_eq!(extensions.users, vec!["a@b.c"]);
        assert!(extensions.stages.is_empty());
    }

    #[test]
    fn schema_form_reads_enumerations() {
        let archive = ContainerArchive::from_entries(vec![(
            "extensions.xsd",
            br#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:simpleType name="TopicStatus"><xs:restriction base="xs:string">
                   <xs:enumeration value="Open"/><xs:enumeration value="Closed"/>
                 </xs:restriction></xs:simpleType>
                 <xs:simpleType name="UserIdType"><xs:restriction base="xs:string">
                   <xs:enumeration value="x@y.z"/>
                 </xs:restriction></xs:simpleType>
               </xs:schema>"#
                .to_vec(),
        )]);
        let extensions = parse_extensions(&archive).unwrap();
        assert_eq!(extensions.topic_statuses, vec!["Open", "Closed"]);
        assert_eq!(extensions.users, vec!["x@y.z"]);
    }

    #[test]
    fn absent_or_empty_vocabulary_is_none() {
        assert!(parse_extensions(&ContainerArchive::default()).is_none());
        let archive =
            ContainerArchive::from_entries(vec![("extensions.xml", b"<Extensions/>".to_vec())]);
        assert!(parse_extensions(&archive).is_none());
    }
}
