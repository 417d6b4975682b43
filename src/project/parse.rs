//! Parsers for the JSON and XML configuration documents.

use roxmltree::{Document, Node};
use serde_json::{Map, Value};

use super::model::{CustomField, ProjectConfiguration};

const ROOT_ELEMENT: &str = "Data";

/// Parses the JSON form of the configuration document.
///
/// Property names match case-insensitively, so `Url`, `url`, and `URL` all
/// set the connection URL. When two spellings of one property appear in the
/// same object, the later one wins.
///
/// # Errors
///
/// Returns the parser message when the text is not a valid document.
pub fn parse_json(text: &str) -> Result<ProjectConfiguration, String> {
    let document: Value = serde_json::from_str(text).map_err(|error| error.to_string())?;
    serde_json::from_value(fold_property_names(document)).map_err(|error| error.to_string())
}

fn fold_property_names(value: Value) -> Value {
    match value {
        Value::Object(properties) => Value::Object(
            properties
                .into_iter()
                .map(|(name, nested)| (name.to_lowercase(), fold_property_names(nested)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(fold_property_names).collect()),
        other => other,
    }
}

/// Parses the XML form of the configuration document.
///
/// Element and attribute names are compared by local name, so namespace
/// prefixes and declared namespace URIs are ignored. Names stay
/// case-sensitive. Unknown elements are skipped and missing ones keep their
/// defaults.
///
/// # Errors
///
/// Returns a message when the text is not well-formed XML or the root
/// element is not `<Data>`.
pub fn parse_xml(text: &str) -> Result<ProjectConfiguration, String> {
    let document = Document::parse(text).map_err(|error| error.to_string())?;
    let root = document.root_element();
    if root.tag_name().name() != ROOT_ELEMENT {
        return Err(format!(
            "expected root element <{ROOT_ELEMENT}>, found <{}>",
            root.tag_name().name()
        ));
    }

    let mut configuration = ProjectConfiguration::default();

    if let Some(connection) = child(root, "Connection") {
        if let Some(url) = child_text(connection, "Url") {
            configuration.connection.url = url;
        }
        if let Some(project) = child_text(connection, "Project") {
            configuration.connection.project = project;
        }
    }

    if let Some(test_case) = child(root, "TestCase") {
        if let Some(area_path) = child_text(test_case, "AreaPath") {
            configuration.test_case.area_path = area_path;
        }
        if let Some(fields) = child(test_case, "CustomFields") {
            configuration.test_case.custom_fields = elements(fields, "CustomField")
                .map(|field| {
                    CustomField::new(
                        attribute(field, "id").unwrap_or_default(),
                        attribute(field, "defaultvalue").unwrap_or_default(),
                    )
                })
                .collect();
        }
    }

    Ok(configuration)
}

fn elements<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    parent
        .children()
        .filter(move |node| node.is_element() && node.tag_name().name() == name)
}

fn child<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|node| node.is_element() && node.tag_name().name() == name)
}

fn child_text(parent: Node<'_, '_>, name: &str) -> Option<String> {
    child(parent, name).map(|node| {
        node.children()
            .filter(Node::is_text)
            .filter_map(|text| text.text())
            .collect()
    })
}

fn attribute(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attributes()
        .find(|attribute| attribute.name() == name)
        .map(|attribute| attribute.value().to_owned())
}
