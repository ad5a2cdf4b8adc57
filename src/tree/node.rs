//! Explored tree types

use std::fmt;

use crate::object::{Key, Value};

use super::category::Category;

/// One explored value.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: Key,
    /// Reference to the explored value; the tree never owns heap objects.
    pub value: Value,
    pub category: Category,
    /// How to re-obtain `value` from the root.
    pub path: String,
    pub children: Vec<Node>,
    pub is_cyclic: bool,
}

impl Node {
    pub fn new(key: Key, value: Value, category: Category, path: String) -> Self {
        Self {
            key,
            value,
            category,
            path,
            children: Vec::new(),
            is_cyclic: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order iterator over this node and its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// First descendant (or self) with the given path.
    pub fn find(&self, path: &str) -> Option<&Node> {
        self.iter().find(|n| n.path == path)
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

/// Informational events raised while building a tree. None of these stop
/// the traversal elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalStatus {
    /// A node at the depth limit had children that were not expanded.
    DepthLimitReached { path: String },
    /// A node had more included children than the fan-out limit.
    FanoutLimitReached { path: String, limit: usize },
    /// A node re-enters one of its ancestors.
    CircularReference { path: String },
}

impl fmt::Display for TraversalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalStatus::DepthLimitReached { path } => {
                write!(f, "Depth exceeded at {}", display_path(path))
            }
            TraversalStatus::FanoutLimitReached { path, limit } => {
                write!(f, "Only {} children shown at {}", limit, display_path(path))
            }
            TraversalStatus::CircularReference { path } => {
                write!(f, "Circular reference detected: {}", display_path(path))
            }
        }
    }
}

/// Label for a path; the globals root has an empty path.
pub fn display_path(path: &str) -> &str {
    if path.is_empty() { "<globals>" } else { path }
}

/// Result of one traversal: the tree plus every status it raised.
#[derive(Debug, Clone)]
pub struct Explored {
    pub root: Node,
    pub statuses: Vec<TraversalStatus>,
}

impl Explored {
    /// The most recent status, as shown in a status line. Empty when the
    /// traversal raised none.
    pub fn status_message(&self) -> String {
        self.statuses
            .last()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn cyclic_paths(&self) -> Vec<&str> {
        self.root
            .iter()
            .filter(|n| n.is_cyclic)
            .map(|n| n.path.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: &str, path: &str) -> Node {
        Node::new(Key::from(key), Value::Int(0), Category::ScalarLike, path.to_string())
    }

    #[test]
    fn test_iter_is_preorder() {
        let mut a = leaf("a", "a");
        a.children.push(leaf("b", "a.b"));
        let mut root = leaf("r", "");
        root.children.push(a);
        root.children.push(leaf("c", "c"));

        let paths: Vec<&str> = root.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["", "a", "a.b", "c"]);
        assert_eq!(root.count(), 4);
        assert!(root.find("a.b").is_some_and(Node::is_leaf));
    }

    #[test]
    fn test_status_message_is_last_status() {
        let explored = Explored {
            root: leaf("r", "r"),
            statuses: vec![
                TraversalStatus::DepthLimitReached {
                    path: "r.a".to_string(),
                },
                TraversalStatus::CircularReference {
                    path: "r.b".to_string(),
                },
            ],
        };
        assert_eq!(explored.status_message(), "Circular reference detected: r.b");

        let quiet = Explored {
            root: leaf("r", "r"),
            statuses: Vec::new(),
        };
        assert_eq!(quiet.status_message(), "");
    }
}
