//! Tree formatting and display
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `display` - Row descriptions and the sorted display tree
//! - `tree` - Console tree formatter
//! - `json` - JSON output
//! - `export` - Clipboard path export

mod config;
mod display;
mod export;
mod json;
mod tree;

pub use config::{OutputConfig, SortColumn};
pub use display::{
    DisplayNode, NodeRow, PREVIEW_LINES, describe, size_descriptor, truncate_preview, type_name,
};
pub use export::{PATH_SEPARATOR, export_paths, glob_match, select_nodes};
pub use json::print_json;
pub use tree::{CIRCULAR_MARKER, TreeFormatter};
