//! Flat XML exporter.
//!
//! Output shape:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <data><item name="KEY">value text</item>...</data>
//! ```

use std::io::Cursor;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use super::write_output;
use crate::common::xml::{escape_attribute, escape_text};
use crate::common::{Error, Result};
use crate::sketch::ValueMap;

/// Root element name.
pub const ROOT_ELEMENT: &str = "data";
/// Per-key element name.
pub const ITEM_ELEMENT: &str = "item";

/// Render `map` as flat XML.
///
/// Each top-level key becomes one `<item>` whose `name` attribute is the key
/// and whose text is [`Value::to_display_text`](crate::sketch::Value::to_display_text).
pub fn to_xml_string(map: &ValueMap) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(|e| Error::Serialization(format!("Failed to write XML declaration: {}", e)))?;
    writer
        .write_event(Event::Text(BytesText::from_escaped("\n")))
        .map_err(|e| Error::Serialization(format!("Failed to write XML text: {}", e)))?;

    writer
        .write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
        .map_err(|e| Error::Serialization(format!("Failed to write root element: {}", e)))?;

    for (key, value) in map {
        let mut item = BytesStart::new(ITEM_ELEMENT);
        item.push_attribute(Attribute {
            key: QName(b"name"),
            value: escape_attribute(key).into_bytes().into(),
        });
        writer
            .write_event(Event::Start(item))
            .map_err(|e| Error::Serialization(format!("Failed to write item element: {}", e)))?;

        let text = escape_text(&value.to_display_text());
        writer
            .write_event(Event::Text(BytesText::from_escaped(text)))
            .map_err(|e| Error::Serialization(format!("Failed to write item text: {}", e)))?;

        writer
            .write_event(Event::End(BytesEnd::new(ITEM_ELEMENT)))
            .map_err(|e| Error::Serialization(format!("Failed to close item element: {}", e)))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
        .map_err(|e| Error::Serialization(format!("Failed to close root element: {}", e)))?;

    let result = writer.into_inner().into_inner();
    String::from_utf8(result)
        .map_err(|e| Error::Serialization(format!("Invalid UTF-8 in generated XML: {}", e)))
}

/// Render `map` as flat XML and write it to `path`.
pub fn write_xml(map: &ValueMap, path: &Path) -> Result<()> {
    let xml = to_xml_string(map)?;
    write_output(path, &xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::Value;

    #[test]
    fn test_declaration_and_root() {
        let xml = to_xml_string(&ValueMap::new()).unwrap();
        assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<data></data>");
    }

    #[test]
    fn test_nested_values_are_flattened() {
        let mut inner = ValueMap::new();
        inner.insert(
            "b".to_string(),
            Value::Array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]),
        );
        let mut map = ValueMap::new();
        map.insert("a".to_string(), Value::Dictionary(inner));

        let xml = to_xml_string(&map).unwrap();
        assert_eq!(xml.matches("<item ").count(), 1);
        assert!(xml.contains(r#"<item name="a">{"b":[1,2,3]}</item>"#));
        assert!(!xml.contains("<b>"));
    }

    #[test]
    fn test_one_item_per_key_in_order() {
        let mut map = ValueMap::new();
        map.insert("version".to_string(), Value::Integer(88));
        map.insert("app".to_string(), Value::from("com.bohemiancoding.sketch3"));
        let xml = to_xml_string(&map).unwrap();

        assert!(xml.ends_with(
            "<data><item name=\"version\">88</item>\
             <item name=\"app\">com.bohemiancoding.sketch3</item></data>"
        ));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let mut map = ValueMap::new();
        map.insert("a<&\"b".to_string(), Value::from("x < y & z"));
        let xml = to_xml_string(&map).unwrap();
        assert!(xml.contains("name=\"a&lt;&amp;&quot;b\""));
        assert!(xml.contains(">x &lt; y &amp; z</item>"));
    }

    #[test]
    fn test_write_xml_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_metadata.xml");
        let mut map = ValueMap::new();
        map.insert("k".to_string(), Value::from("v"));
        write_xml(&map, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(written.contains("<item name=\"k\">v</item>"));
    }
}
