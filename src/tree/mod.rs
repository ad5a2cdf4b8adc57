//! Object tree building
//!
//! This module turns a value into a bounded tree of display nodes:
//!
//! - `Classifier`: decides a value's [`Category`] and enumerates its children
//! - `build_path`: writes the access path of each child
//! - `AncestorChain`: flags children that re-enter an ancestor
//! - `TreeBuilder`: ties them together under depth, fan-out and category limits
//! - `Explorer`: keeps the last tree and status line across rebuilds

mod builder;
mod category;
mod classify;
mod config;
mod cycle;
mod node;
mod path;
mod resolve;
mod session;

// Re-export public types
pub use builder::TreeBuilder;
pub use category::Category;
pub use classify::{Classification, Classifier, is_degenerate_matrix};
pub use config::{
    CategoryFilter, DEFAULT_ENTRY_MODULE, DEFAULT_MAX_CHILDREN, DEFAULT_MAX_DEPTH, ExploreConfig,
};
pub use cycle::AncestorChain;
pub use node::{Explored, Node, TraversalStatus, display_path};
pub use path::build_path;
pub use resolve::resolve_root;
pub use session::{Explorer, INVALID_ROOT_MESSAGE, explore};
