//! Line-oriented manifest.yml emitter
//!
//! Output is produced by walking [`RULES`] once, in order. Downstream tooling
//! reads the fields positionally, so the table order is part of the format.
//!
//! ```text
//! mainClass: com.example.Main
//! name: My Game Lite
//! ...
//! hidden: true
//! price: 4.99
//! compatibility:
//!   - PC
//! categories:
//! tags:
//! trial:
//!   allowance: PT2H
//!   window: P3D
//! ```

use crate::config::{EmitOptions, EmptyCollections, TrialConfig};
use crate::derive::DerivedValues;
use crate::manifest::{fields, ManifestDocument};
use crate::{ConvertError, Result};

/// Whether a collection block keeps its header when it has no items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPolicy {
    Always,
    NonEmpty,
}

/// One row of the field mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `key: <text of field>`, empty value when absent
    Scalar {
        key: &'static str,
        field: &'static str,
    },
    /// `hidden: true|false` from the derived visibility flag
    Hidden,
    /// `key:` header followed by `  - <text>` per item
    List {
        key: &'static str,
        container: &'static str,
        /// Only children with this name; `None` takes every child element
        child: Option<&'static str>,
        header: HeaderPolicy,
    },
    /// `features:` with `  - type:` / `    mode:` pairs
    Features,
    /// `trial:` block, only for priced packages
    Trial,
}

/// The field mapping table, in output order
pub const RULES: [Rule; 16] = [
    Rule::Scalar {
        key: "mainClass",
        field: fields::MAIN_CLASS,
    },
    Rule::Scalar {
        key: "name",
        field: fields::NAME,
    },
    Rule::Scalar {
        key: "internalId",
        field: fields::INTERNAL_ID,
    },
    Rule::Scalar {
        key: "tagline",
        field: fields::TAG_LINE,
    },
    Rule::Scalar {
        key: "description",
        field: fields::DESCRIPTION,
    },
    Rule::Scalar {
        key: "version",
        field: fields::VERSION,
    },
    Rule::Scalar {
        key: "access",
        field: fields::ACCESS,
    },
    Rule::Hidden,
    Rule::Scalar {
        key: "price",
        field: fields::PRICE,
    },
    Rule::List {
        key: "compatibility",
        container: fields::COMPATIBILITY,
        child: Some(fields::GAME_TYPE),
        header: HeaderPolicy::Always,
    },
    Rule::List {
        key: "categories",
        container: fields::CATEGORIES,
        child: Some(fields::CATEGORY),
        header: HeaderPolicy::Always,
    },
    Rule::List {
        key: "resources",
        container: fields::RESOURCES,
        child: None,
        header: HeaderPolicy::NonEmpty,
    },
    Rule::Features,
    Rule::List {
        key: "tags",
        container: fields::TAGS,
        child: Some(fields::TAG),
        header: HeaderPolicy::Always,
    },
    Rule::Trial,
    Rule::List {
        key: "obfuscation",
        container: fields::OBFUSCATION,
        child: None,
        header: HeaderPolicy::NonEmpty,
    },
];

/// A single structural piece of output
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Field {
        key: &'static str,
        value: String,
    },
    Header {
        key: &'static str,
    },
    Item {
        block: &'static str,
        value: String,
    },
    Feature {
        kind: String,
        mode: String,
    },
    Entry {
        block: &'static str,
        key: &'static str,
        value: String,
    },
}

impl Line {
    fn render(&self, out: &mut String) {
        match self {
            Line::Field { key, value } => out.push_str(&format!("{}: {}\n", key, value)),
            Line::Header { key } => out.push_str(&format!("{}:\n", key)),
            Line::Item { value, .. } => out.push_str(&format!("  - {}\n", value)),
            Line::Feature { kind, mode } => {
                out.push_str(&format!("  - type: {}\n", kind));
                out.push_str(&format!("    mode: {}\n", mode));
            }
            Line::Entry { key, value, .. } => out.push_str(&format!("  {}: {}\n", key, value)),
        }
    }

    /// Name of the first value that contains a line break
    fn unsafe_field(&self) -> Option<String> {
        fn breaks(v: &str) -> bool {
            v.contains(['\n', '\r'])
        }

        match self {
            Line::Field { key, value } if breaks(value) => Some(key.to_string()),
            Line::Item { block, value } if breaks(value) => Some(block.to_string()),
            Line::Feature { kind, .. } if breaks(kind) => Some("features.type".to_string()),
            Line::Feature { mode, .. } if breaks(mode) => Some("features.mode".to_string()),
            Line::Entry { block, key, value } if breaks(value) => {
                Some(format!("{}.{}", block, key))
            }
            _ => None,
        }
    }
}

/// Walks the rule table for one document
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    options: EmitOptions,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EmitOptions) -> Self {
        Self { options }
    }

    /// Produce the output text for one manifest.
    ///
    /// Only strict mode can fail, with `UnsafeValue` naming the offending field.
    pub fn emit(
        &self,
        doc: &ManifestDocument,
        derived: &DerivedValues,
        trial: &TrialConfig,
    ) -> Result<String> {
        let lines = self.lines(doc, derived, trial);

        if self.options.strict {
            if let Some(field) = lines.iter().find_map(Line::unsafe_field) {
                return Err(ConvertError::UnsafeValue { field });
            }
        }

        Ok(render_lines(&lines))
    }

    fn lines(
        &self,
        doc: &ManifestDocument,
        derived: &DerivedValues,
        trial: &TrialConfig,
    ) -> Vec<Line> {
        let mut lines = Vec::new();

        for rule in RULES {
            match rule {
                Rule::Scalar { key, field } => lines.push(Line::Field {
                    key,
                    value: doc.scalar(field).unwrap_or_default(),
                }),
                Rule::Hidden => lines.push(Line::Field {
                    key: "hidden",
                    value: derived.hidden.to_string(),
                }),
                Rule::List {
                    key,
                    container,
                    child,
                    header,
                } => {
                    let items = doc.item_texts(container, child);
                    if self.keep_header(header, items.is_empty()) {
                        lines.push(Line::Header { key });
                    }
                    lines.extend(
                        items
                            .into_iter()
                            .map(|value| Line::Item { block: key, value }),
                    );
                }
                Rule::Features => {
                    let features = doc.features();
                    if self.keep_header(HeaderPolicy::NonEmpty, features.is_empty()) {
                        lines.push(Line::Header { key: "features" });
                    }
                    lines.extend(features.into_iter().map(|f| Line::Feature {
                        kind: f.kind,
                        mode: f.mode.unwrap_or_default(),
                    }));
                }
                Rule::Trial => {
                    if derived.has_trial() {
                        lines.push(Line::Header { key: "trial" });
                        lines.push(Line::Entry {
                            block: "trial",
                            key: "allowance",
                            value: trial.allowance.clone(),
                        });
                        lines.push(Line::Entry {
                            block: "trial",
                            key: "window",
                            value: trial.window.clone(),
                        });
                    }
                }
            }
        }

        lines
    }

    fn keep_header(&self, policy: HeaderPolicy, empty: bool) -> bool {
        if !empty {
            return true;
        }
        match self.options.empty_collections {
            EmptyCollections::Legacy => policy == HeaderPolicy::Always,
            EmptyCollections::Always => true,
            EmptyCollections::Omit => false,
        }
    }
}

/// Emit with the default options: verbatim values, legacy empty-collection policy
pub fn emit(doc: &ManifestDocument, derived: &DerivedValues, trial: &TrialConfig) -> String {
    render_lines(&Emitter::new().lines(doc, derived, trial))
}

fn render_lines(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        line.render(&mut out);
    }
    out
}
