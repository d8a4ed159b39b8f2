//! manifest-yml - XML package manifest to manifest.yml converter
//!
//! Converts `<manifest>` XML documents into the flat, indented manifest.yml
//! layout read by downstream packaging tools. A few output fields are derived
//! rather than copied: the `hidden` flag and the optional `trial` block.
//!
//! # Architecture
//!
//! - **manifest**: XML reading and typed field access
//! - **derive**: Derivation engine (visibility flag, numeric price)
//! - **emit**: Ordered field-rule table and line emitter
//! - **convert**: parse → derive → emit for one document
//! - **batch**: Directory discovery, output naming, per-file failure isolation
//! - **config**: Trial strings, emission options, config file
//!
//! # Example
//!
//! ```
//! use manifest_yml::config::{EmitOptions, TrialConfig};
//!
//! let xml = "<manifest><name>Demo Lite</name><price>4.99</price></manifest>";
//! let yaml = manifest_yml::convert_str(xml, &TrialConfig::default(), EmitOptions::default())?;
//! assert!(yaml.contains("hidden: true\n"));
//! assert!(yaml.contains("trial:\n  allowance: PT1H\n  window: P7D\n"));
//! # Ok::<(), manifest_yml::ConvertError>(())
//! ```

// Core modules
pub mod config;
pub mod convert;
pub mod derive;
pub mod emit;
pub mod error;
pub mod manifest;

// Command-line harness
pub mod batch;
pub mod logging;
pub mod prompt;
pub mod style;

// Re-exports
pub use convert::{convert_bytes, convert_document, convert_str};
pub use error::{ConvertError, Result};
