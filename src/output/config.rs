//! Output configuration types

/// Column used to order sibling rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Key,
    Type,
    Category,
    Size,
    Value,
}

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Natural-sort siblings by this column; `None` keeps traversal order.
    pub sort: Option<SortColumn>,
    /// Show every level; otherwise only the root's direct children are
    /// listed and deeper subtrees are summarised.
    pub auto_expand: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            sort: Some(SortColumn::Key),
            auto_expand: true,
        }
    }
}
