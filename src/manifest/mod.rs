//! Manifest document parsing
//!
//! Reads package manifests into an owned element tree and exposes the
//! known `<manifest>` fields through optional accessors.
//!
//! # Example Manifest
//!
//! ```xml
//! <manifest>
//!   <main-class>com.example.Main</main-class>
//!   <name>My Game Lite</name>
//!   <price>4.99</price>
//!   <compatibility>
//!     <game-type>PC</game-type>
//!   </compatibility>
//!   <features>
//!     <feature mode="coop">multiplayer</feature>
//!   </features>
//! </manifest>
//! ```

mod document;
mod parser;

pub use document::{fields, Feature, ManifestDocument};
pub use parser::{decode_document, parse_tree, Attribute, Element, Node};
