//! Objex - browse an object graph as a tree of containers and instances
//!
//! A [`Namespace`] holds a heap of objects. [`tree::explore`] resolves a
//! dotted root path in it and builds a bounded [`Node`] tree, classifying
//! every value, attaching access paths and flagging cycles.

pub mod error;
pub mod natural;
pub mod object;
pub mod output;
pub mod snapshot;
pub mod tree;

pub use error::{ExploreError, ShapeError, SnapshotError};
pub use natural::{natural_cmp, natural_key, sort_natural};
pub use object::{Class, Heap, Key, Namespace, ObjId, Value};
pub use output::{
    DisplayNode, OutputConfig, SortColumn, TreeFormatter, export_paths, print_json, select_nodes,
};
pub use snapshot::{demo_namespace, load_snapshot, load_snapshot_file};
pub use tree::{
    Category, CategoryFilter, ExploreConfig, Explored, Explorer, Node, TraversalStatus,
    TreeBuilder, explore,
};
