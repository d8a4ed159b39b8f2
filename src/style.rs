//! Terminal styling for batch progress output
//!
//! Uses crossterm for cross-platform terminal colors.

use crossterm::style::{StyledContent, Stylize};
use std::path::Path;

/// Marker for a converted file
pub fn converted_marker() -> StyledContent<&'static str> {
    "✓".green()
}

/// Marker for a failed file
pub fn failed_marker() -> StyledContent<&'static str> {
    "✗".red().bold()
}

/// Input/output paths
pub fn path_style(path: &Path) -> StyledContent<String> {
    path.display().to_string().cyan()
}

/// Count styling for the run summary
/// - Zero: Dim
/// - Converted: Green
/// - Failed: Red
pub fn count_converted(n: usize) -> StyledContent<String> {
    if n == 0 {
        n.to_string().dark_grey()
    } else {
        n.to_string().green()
    }
}

pub fn count_failed(n: usize) -> StyledContent<String> {
    if n == 0 {
        n.to_string().dark_grey()
    } else {
        n.to_string().red().bold()
    }
}
