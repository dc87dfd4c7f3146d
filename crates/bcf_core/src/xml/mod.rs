//! XML access helpers shared by every extractor.
//!
//! # Responsibility
//! - Parse entry text into a `roxmltree` tree with uniform error text.
//! - Provide name-based child lookup and trimmed text access.
//! - Host the alias table, alias resolution and the custom field scanner.
//!
//! # Invariants
//! - Element names are compared by local name; prefixes are ignored.
//! - Text helpers return `None` for whitespace-only content.

pub mod alias;
pub mod custom_fields;
pub mod fields;

use roxmltree::{Document, Node, ParsingOptions};

/// Parses XML text, tolerating a DTD declaration.
pub fn parse_document(text: &str) -> Result<Document<'_>, String> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Document::parse_with_options(text, options).map_err(|err| err.to_string())
}

pub fn has_name(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

pub fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| has_name(*child, name))
}

pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |child| has_name(*child, name))
}

/// First descendant (or the node itself) with the given local name.
pub fn find_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants().find(|child| has_name(*child, name))
}

/// Direct text children of an element joined and trimmed; `None` when empty.
///
/// Comments and child elements between text runs are skipped.
pub fn element_text(node: Node<'_, '_>) -> Option<String> {
    let joined: String = node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// All descendant text joined by single spaces; `None` when empty.
pub fn deep_text(node: Node<'_, '_>) -> Option<String> {
    let joined = node
        .descendants()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

pub fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name).and_then(element_text)
}

/// Non-namespaced attribute value, trimmed; `None` when empty.
pub fn attribute_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// First non-empty attribute among `names`.
pub fn first_attribute(node: Node<'_, '_>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| attribute_text(node, name))
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

pub fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{
        attribute_text, child_text, deep_text, element_text, parse_bool, parse_document, parse_f64,
    };

    #[test]
    fn text_helpers_trim_and_skip_blank_values() {
        let doc = parse_document(
            r#"<Topic Guid=" abc " Empty="  "><Title>  Leak  </Title><Blank>   </Blank></Topic>"#,
        )
        .unwrap();
        let topic = doc.root_element();
        assert_eq!(attribute_text(topic, "Guid").as_deref(), Some("abc"));
        assert_eq!(attribute_text(topic, "Empty"), None);
        assert_eq!(child_text(topic, "Title").as_deref(), Some("Leak"));
        assert_eq!(child_text(topic, "Blank"), None);
    }

    #[test]
    fn element_text_spans_comments_and_inline_children() {
        let doc = parse_document(
            "<Topic><Title><!-- x -->Real</Title><Description>a<b/>c</Description></Topic>",
        )
        .unwrap();
        let topic = doc.root_element();
        assert_eq!(child_text(topic, "Title").as_deref(), Some("Real"));
        assert_eq!(child_text(topic, "Description").as_deref(), Some("ac"));

        let doc = parse_document("<Title><!-- only --></Title>").unwrap();
        assert_eq!(element_text(doc.root_element()), None);
    }

    #[test]
    fn deep_text_joins_nested_values() {
        let doc = parse_document("<A><B> one </B><C><D>two</D></C></A>").unwrap();
        assert_eq!(deep_text(doc.root_element()).as_deref(), Some("one two"));
    }

    #[test]
    fn malformed_xml_is_reported_as_text() {
        assert!(parse_document("<A><B></A>").is_err());
    }

    #[test]
    fn scalar_parsers_accept_common_spellings() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_f64(" -7.5 "), Some(-7.5));
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("x"), None);
    }
}
