//! Configuration types for tree building

use super::category::Category;

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_MAX_CHILDREN: usize = 100;
pub const DEFAULT_ENTRY_MODULE: &str = "__main__";

/// Per-category inclusion flags. An excluded category is skipped when
/// enumerating children; the root is always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    pub mapping: bool,
    pub sequence: bool,
    pub owned: bool,
    pub library: bool,
    pub scalar: bool,
}

impl CategoryFilter {
    pub fn includes(&self, category: Category) -> bool {
        match category {
            Category::Mapping => self.mapping,
            Category::Sequence => self.sequence,
            Category::InstanceOwned => self.owned,
            Category::InstanceLibrary => self.library,
            Category::ScalarLike => self.scalar,
        }
    }

    /// True when no category is excluded.
    pub fn includes_all(&self) -> bool {
        *self == Self::default()
    }

    pub fn without(mut self, category: Category) -> Self {
        match category {
            Category::Mapping => self.mapping = false,
            Category::Sequence => self.sequence = false,
            Category::InstanceOwned => self.owned = false,
            Category::InstanceLibrary => self.library = false,
            Category::ScalarLike => self.scalar = false,
        }
        self
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            mapping: true,
            sequence: true,
            owned: true,
            library: true,
            scalar: true,
        }
    }
}

/// Configuration for tree building behavior.
#[derive(Debug, Clone)]
pub struct ExploreConfig {
    /// Levels below the root that may be expanded. Nodes at this depth
    /// are shown without children.
    pub max_depth: usize,
    /// Children emitted per node; the rest are dropped and reported.
    pub max_children_per_node: usize,
    pub filter: CategoryFilter,
    /// Presentation hint: show every level expanded.
    pub auto_expand: bool,
    /// Module whose classes count as owned rather than library code.
    pub entry_module: String,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_children_per_node: DEFAULT_MAX_CHILDREN,
            filter: CategoryFilter::default(),
            auto_expand: true,
            entry_module: DEFAULT_ENTRY_MODULE.to_string(),
        }
    }
}
