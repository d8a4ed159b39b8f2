//! Typed view over a parsed `<manifest>` document

use super::parser::{decode_document, parse_tree, Element};
use crate::{ConvertError, Result};
use std::path::Path;

/// Child element names of `<manifest>`
pub mod fields {
    pub const ROOT: &str = "manifest";

    pub const MAIN_CLASS: &str = "main-class";
    pub const NAME: &str = "name";
    pub const INTERNAL_ID: &str = "internal-id";
    pub const TAG_LINE: &str = "tag-line";
    pub const DESCRIPTION: &str = "description";
    pub const VERSION: &str = "version";
    pub const ACCESS: &str = "access";
    pub const PRICE: &str = "price";
    pub const HIDDEN: &str = "hidden";

    pub const COMPATIBILITY: &str = "compatibility";
    pub const GAME_TYPE: &str = "game-type";
    pub const CATEGORIES: &str = "categories";
    pub const CATEGORY: &str = "category";
    pub const RESOURCES: &str = "resources";
    pub const FEATURES: &str = "features";
    pub const FEATURE: &str = "feature";
    pub const FEATURE_MODE: &str = "mode";
    pub const TAGS: &str = "tags";
    pub const TAG: &str = "tag";
    pub const OBFUSCATION: &str = "obfuscation";
}

/// A parsed manifest document
///
/// Every lookup returns an `Option` or an empty list; a missing field is
/// never an error at this level.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    root: Element,
}

/// One `<feature mode="...">text</feature>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub kind: String,
    pub mode: Option<String>,
}

impl ManifestDocument {
    /// Parse a manifest from XML content
    pub fn parse(xml: &str) -> Result<Self> {
        Self::from_root(parse_tree(xml)?)
    }

    /// Parse a manifest from raw bytes in whatever encoding it declares
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(&decode_document(bytes)?)
    }

    /// Parse a manifest from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already-built tree, checking the root element name
    pub fn from_root(root: Element) -> Result<Self> {
        if root.name != fields::ROOT {
            return Err(ConvertError::MalformedInput(format!(
                "expected <{}> root element, found <{}>",
                fields::ROOT,
                root.name
            )));
        }
        Ok(Self { root })
    }

    /// The `<manifest>` element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Text of a scalar child field, `None` when the element is absent
    pub fn scalar(&self, field: &str) -> Option<String> {
        self.root.child(field).map(Element::text)
    }

    /// A collection container element, `None` when absent
    pub fn collection(&self, container: &str) -> Option<&Element> {
        self.root.child(container)
    }

    /// Items of a collection, optionally filtered by child name.
    /// An absent container yields no items.
    pub fn items(&self, container: &str, child: Option<&str>) -> Vec<&Element> {
        let Some(container) = self.collection(container) else {
            return Vec::new();
        };
        match child {
            Some(name) => container.elements_named(name).collect(),
            None => container.elements().collect(),
        }
    }

    /// Text values of a collection's items
    pub fn item_texts(&self, container: &str, child: Option<&str>) -> Vec<String> {
        self.items(container, child)
            .into_iter()
            .map(Element::text)
            .collect()
    }

    pub fn name(&self) -> Option<String> {
        self.scalar(fields::NAME)
    }

    pub fn hidden(&self) -> Option<String> {
        self.scalar(fields::HIDDEN)
    }

    pub fn price(&self) -> Option<String> {
        self.scalar(fields::PRICE)
    }

    /// Entries of the `<features>` collection
    pub fn features(&self) -> Vec<Feature> {
        self.items(fields::FEATURES, Some(fields::FEATURE))
            .into_iter()
            .map(|e| Feature {
                kind: e.text(),
                mode: e.attribute(fields::FEATURE_MODE).map(str::to_string),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_MANIFEST: &str = r#"
        <manifest>
            <main-class>com.example.Main</main-class>
            <name>Space Trader Lite</name>
            <price>2.50</price>
            <compatibility>
                <game-type>PC</game-type>
                <note>ignored</note>
                <game-type>Console</game-type>
            </compatibility>
            <resources>
                <icon>icon.png</icon>
                <banner>banner.png</banner>
            </resources>
            <features>
                <feature mode="coop">multiplayer</feature>
                <feature>achievements</feature>
            </features>
        </manifest>
    "#;

    #[test]
    fn test_scalars() {
        let doc = ManifestDocument::parse(EXAMPLE_MANIFEST).unwrap();
        assert_eq!(doc.scalar(fields::MAIN_CLASS).as_deref(), Some("com.example.Main"));
        assert_eq!(doc.name().as_deref(), Some("Space Trader Lite"));
        assert_eq!(doc.price().as_deref(), Some("2.50"));
        assert_eq!(doc.hidden(), None);
        assert_eq!(doc.scalar(fields::VERSION), None);
    }

    #[test]
    fn test_items_filtered_by_child_name() {
        let doc = ManifestDocument::parse(EXAMPLE_MANIFEST).unwrap();
        assert_eq!(
            doc.item_texts(fields::COMPATIBILITY, Some(fields::GAME_TYPE)),
            vec!["PC", "Console"]
        );
    }

    #[test]
    fn test_items_any_child_name() {
        let doc = ManifestDocument::parse(EXAMPLE_MANIFEST).unwrap();
        assert_eq!(
            doc.item_texts(fields::RESOURCES, None),
            vec!["icon.png", "banner.png"]
        );
    }

    #[test]
    fn test_items_with_temporary_names() {
        let doc = ManifestDocument::parse(EXAMPLE_MANIFEST).unwrap();
        let items = {
            let container = fields::COMPATIBILITY.to_string();
            let child = fields::GAME_TYPE.to_string();
            doc.items(&container, Some(&child))
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text(), "Console");
    }

    #[test]
    fn test_absent_collection_is_empty() {
        let doc = ManifestDocument::parse(EXAMPLE_MANIFEST).unwrap();
        assert!(doc.collection(fields::TAGS).is_none());
        assert!(doc.items(fields::TAGS, Some(fields::TAG)).is_empty());
    }

    #[test]
    fn test_features() {
        let doc = ManifestDocument::parse(EXAMPLE_MANIFEST).unwrap();
        let features = doc.features();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].kind, "multiplayer");
        assert_eq!(features[0].mode.as_deref(), Some("coop"));
        assert_eq!(features[1].mode, None);
    }

    #[test]
    fn test_wrong_root_rejected() {
        let err = ManifestDocument::parse("<package><name>x</name></package>").unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput(_)));
    }

    #[test]
    fn test_from_file() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), EXAMPLE_MANIFEST).unwrap();

        let doc = ManifestDocument::from_file(temp_file.path()).unwrap();
        assert_eq!(doc.name().as_deref(), Some("Space Trader Lite"));

        let missing = ManifestDocument::from_file(Path::new("/nonexistent/manifest.xml"));
        assert!(matches!(missing, Err(ConvertError::Io(_))));
    }

    #[test]
    fn test_from_bytes_latin1_declaration() {
        let bytes: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
            <manifest><name>Caf\xE9</name></manifest>";
        let doc = ManifestDocument::from_bytes(bytes).unwrap();
        assert_eq!(doc.name().as_deref(), Some("Caf\u{e9}"));
    }

    #[test]
    fn test_from_bytes_invalid_utf8_is_malformed() {
        let err =
            ManifestDocument::from_bytes(b"<manifest><name>Caf\xE9</name></manifest>").unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput(_)));
        assert!(err.is_document_error());
    }

    #[test]
    fn test_from_root() {
        let doc = ManifestDocument::from_root(Element::new("manifest")).unwrap();
        assert!(doc.root().children.is_empty());
        assert!(ManifestDocument::from_root(Element::new("other")).is_err());
    }
}
