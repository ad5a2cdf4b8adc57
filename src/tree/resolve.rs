//! Root path resolution

use crate::error::ExploreError;
use crate::object::{Namespace, Value};

/// Resolve a dotted attribute path against the namespace's globals.
/// An empty path resolves to the globals object itself.
pub fn resolve_root(namespace: &Namespace, root_path: &str) -> Result<Value, ExploreError> {
    let mut current = Value::Ref(namespace.globals());
    if root_path.is_empty() {
        return Ok(current);
    }

    for segment in root_path.split('.') {
        let next = current
            .identity()
            .and_then(|id| namespace.heap().get(id).attr(segment))
            .cloned();
        current = next.ok_or_else(|| ExploreError::InvalidRoot {
            path: root_path.to_string(),
            segment: segment.to_string(),
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Class, Key};

    fn namespace() -> Namespace {
        let mut ns = Namespace::new();
        let inner = ns.heap_mut().instance(Class::new("__main__", "Inner"));
        ns.heap_mut().set_attr(inner, "n", Value::Int(8));
        let outer = ns.heap_mut().instance(Class::new("__main__", "Outer"));
        ns.heap_mut().set_attr(outer, "inner", inner);
        let d = ns.heap_mut().dict(vec![(Key::from("k"), Value::Int(1))]);
        ns.set_global("outer", outer);
        ns.set_global("d", d);
        ns
    }

    #[test]
    fn test_empty_path_is_globals() {
        let ns = namespace();
        assert_eq!(resolve_root(&ns, "").ok(), Some(Value::Ref(ns.globals())));
    }

    #[test]
    fn test_dotted_attribute_walk() {
        let ns = namespace();
        assert_eq!(resolve_root(&ns, "outer.inner.n").ok(), Some(Value::Int(8)));
    }

    #[test]
    fn test_missing_attribute_is_invalid_root() {
        let ns = namespace();
        match resolve_root(&ns, "outer.missing.n") {
            Err(ExploreError::InvalidRoot { path, segment }) => {
                assert_eq!(path, "outer.missing.n");
                assert_eq!(segment, "missing");
            }
            other => panic!("expected invalid root, got {:?}", other),
        }
    }

    #[test]
    fn test_mapping_keys_are_not_attributes() {
        let ns = namespace();
        assert!(resolve_root(&ns, "d.k").is_err());
    }

    #[test]
    fn test_attribute_of_scalar_is_invalid() {
        let ns = namespace();
        assert!(resolve_root(&ns, "outer.inner.n.real").is_err());
        assert!(resolve_root(&ns, "outer..inner").is_err());
    }
}
