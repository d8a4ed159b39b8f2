//! Directory batch conversion
//!
//! Finds `*.xml` manifests below a directory, converts each one and writes
//! `<name>.manifest.yml` next to it. A failing file is recorded and the run
//! moves on to the next one.

use crate::config::{EmitOptions, TrialConfig};
use crate::convert::convert_bytes;
use crate::{ConvertError, Result};
use glob::{MatchOptions, Pattern};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix replacing the input file's extension
pub const OUTPUT_SUFFIX: &str = ".manifest.yml";

/// Output path for an input manifest: same directory, `<stem>.manifest.yml`
pub fn output_path_for(input: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(OUTPUT_SUFFIX);
    input.with_file_name(name)
}

/// Recursively list `*.xml` files below `dir` (extension matched case-insensitively), sorted
pub fn discover_manifests(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConvertError::Config(format!(
            "Directory does not exist: {}",
            dir.display()
        )));
    }

    let dir_str = dir.to_str().ok_or_else(|| {
        ConvertError::Config(format!("Directory path is not valid UTF-8: {}", dir.display()))
    })?;
    let pattern = format!("{}/**/*.xml", Pattern::escape(dir_str.trim_end_matches('/')));
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    tracing::debug!(pattern = %pattern, "Searching for manifests");

    let entries = glob::glob_with(&pattern, options)
        .map_err(|e| ConvertError::Config(format!("Invalid search pattern: {}", e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Skipping unreadable path"),
        }
    }
    files.sort();

    tracing::info!(dir = %dir.display(), count = files.len(), "Found manifests");
    Ok(files)
}

/// A successfully converted file
#[derive(Debug, Clone)]
pub struct Conversion {
    pub output: PathBuf,
    pub yaml: String,
}

/// Converted input/output pair in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Failed input in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub input: PathBuf,
    pub error: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub converted: Vec<ConvertedFile>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    /// True when no file failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    fn record(&mut self, input: &Path, result: &Result<Conversion>) {
        match result {
            Ok(conversion) => self.converted.push(ConvertedFile {
                input: input.to_path_buf(),
                output: conversion.output.clone(),
            }),
            Err(e) => self.failed.push(FailedFile {
                input: input.to_path_buf(),
                error: e.to_string(),
            }),
        }
    }
}

/// Converts manifests file by file with one trial config for the whole run
#[derive(Debug, Clone)]
pub struct BatchConverter {
    trial: TrialConfig,
    options: EmitOptions,
    dry_run: bool,
}

impl BatchConverter {
    pub fn new(trial: TrialConfig, options: EmitOptions) -> Self {
        Self {
            trial,
            options,
            dry_run: false,
        }
    }

    /// Convert without writing output files
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Read, convert and (unless dry-running) write one manifest
    pub fn convert_file(&self, input: &Path) -> Result<Conversion> {
        let content = fs::read(input)?;
        let yaml = convert_bytes(&content, &self.trial, self.options)?;
        let output = output_path_for(input);

        if self.dry_run {
            tracing::debug!(output = %output.display(), "Dry run, not writing");
        } else {
            fs::write(&output, &yaml)?;
            tracing::debug!(output = %output.display(), bytes = yaml.len(), "Wrote manifest.yml");
        }

        Ok(Conversion { output, yaml })
    }

    /// Convert every file, reporting each result to `observer` as it completes
    pub fn run<F>(&self, files: &[PathBuf], mut observer: F) -> BatchReport
    where
        F: FnMut(&Path, &Result<Conversion>),
    {
        let mut report = BatchReport::default();

        for input in files {
            tracing::info!(input = %input.display(), "Converting manifest");
            let result = self.convert_file(input);

            if let Err(ref e) = result {
                if e.is_document_error() {
                    tracing::warn!(input = %input.display(), error = %e, "Manifest rejected");
                } else {
                    tracing::error!(input = %input.display(), error = %e, "Conversion failed");
                }
            }

            observer(input, &result);
            report.record(input, &result);
        }

        tracing::info!(
            converted = report.converted.len(),
            failed = report.failed.len(),
            "Batch complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("/games/space/game.xml")),
            PathBuf::from("/games/space/game.manifest.yml")
        );
        assert_eq!(
            output_path_for(Path::new("pack.v2.xml")),
            PathBuf::from("pack.v2.manifest.yml")
        );
    }

    #[test]
    fn test_discover_missing_dir() {
        let err = discover_manifests(Path::new("/nonexistent/manifests")).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn test_discover_recursive_sorted() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("b").join("c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("z.xml"), "<manifest/>").unwrap();
        fs::write(nested.join("a.XML"), "<manifest/>").unwrap();
        fs::write(temp.path().join("notes.txt"), "skip").unwrap();
        fs::write(temp.path().join("z.manifest.yml"), "skip").unwrap();

        let files = discover_manifests(temp.path()).unwrap();
        assert_eq!(files, vec![nested.join("a.XML"), temp.path().join("z.xml")]);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("game.xml");
        fs::write(&input, "<manifest><name>Game</name></manifest>").unwrap();

        let converter =
            BatchConverter::new(TrialConfig::default(), EmitOptions::default()).with_dry_run(true);
        let conversion = converter.convert_file(&input).unwrap();

        assert!(conversion.yaml.starts_with("mainClass: \nname: Game\n"));
        assert!(!conversion.output.exists());
    }

    #[test]
    fn test_non_utf8_manifest_is_document_error() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("legacy.xml");
        fs::write(&input, b"<manifest><name>Caf\xE9</name></manifest>").unwrap();

        let converter = BatchConverter::new(TrialConfig::default(), EmitOptions::default());
        let err = converter.convert_file(&input).unwrap_err();
        assert!(err.is_document_error());
    }

    #[test]
    fn test_run_isolates_failures() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.xml");
        let bad = temp.path().join("bad.xml");
        fs::write(&good, "<manifest><name>Good</name></manifest>").unwrap();
        fs::write(&bad, "<manifest><price>1</price></manifest>").unwrap();

        let converter = BatchConverter::new(TrialConfig::default(), EmitOptions::default());
        let mut seen = Vec::new();
        let report = converter.run(&[bad.clone(), good.clone()], |input, result| {
            seen.push((input.to_path_buf(), result.is_ok()));
        });

        assert_eq!(seen, vec![(bad.clone(), false), (good.clone(), true)]);
        assert_eq!(report.total(), 2);
        assert!(!report.is_success());
        assert_eq!(report.failed[0].input, bad);
        assert!(report.failed[0].error.contains("name"));
        assert_eq!(report.converted[0].output, temp.path().join("good.manifest.yml"));
        assert!(temp.path().join("good.manifest.yml").exists());
        assert!(!temp.path().join("bad.manifest.yml").exists());
    }
}
