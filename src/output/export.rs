//! Path export for the clipboard

use glob::Pattern;

use crate::tree::Node;

pub const PATH_SEPARATOR: &str = ", ";

/// Join the access paths of `nodes` in selection order.
pub fn export_paths<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> String {
    nodes
        .into_iter()
        .map(|node| node.path.as_str())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Match a glob pattern against a key or path. Invalid patterns match nothing.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(text))
        .unwrap_or(false)
}

/// Nodes, in pre-order, whose key or full path matches any of `patterns`.
pub fn select_nodes<'a>(root: &'a Node, patterns: &[String]) -> Vec<&'a Node> {
    root.iter()
        .filter(|node| {
            let key = node.key.to_string();
            patterns
                .iter()
                .any(|p| *p == node.path || glob_match(p, &node.path) || glob_match(p, &key))
        })
        .collect()
}
