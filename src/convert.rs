//! Single-document conversion: parse, derive, emit

use crate::config::{EmitOptions, TrialConfig};
use crate::derive::derive;
use crate::emit::Emitter;
use crate::manifest::ManifestDocument;
use crate::Result;

/// Convert one parsed manifest to manifest.yml text
pub fn convert_document(
    doc: &ManifestDocument,
    trial: &TrialConfig,
    options: EmitOptions,
) -> Result<String> {
    let derived = derive(doc)?;
    Emitter::with_options(options).emit(doc, &derived, trial)
}

/// Convert XML manifest content to manifest.yml text.
///
/// Either the whole output is returned or a single error; never partial text.
pub fn convert_str(xml: &str, trial: &TrialConfig, options: EmitOptions) -> Result<String> {
    let doc = ManifestDocument::parse(xml)?;
    convert_document(&doc, trial, options)
}

/// Convert raw manifest bytes, decoded per their byte order mark or XML declaration
pub fn convert_bytes(
    bytes: &[u8],
    trial: &TrialConfig,
    options: EmitOptions,
) -> Result<String> {
    let doc = ManifestDocument::from_bytes(bytes)?;
    convert_document(&doc, trial, options)
}
