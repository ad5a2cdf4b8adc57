//! TreeBuilder - expands a value into a bounded tree of nodes

use tracing::{debug, info};

use crate::object::{Heap, Key, Value};

use super::category::Category;
use super::classify::Classifier;
use super::config::ExploreConfig;
use super::cycle::AncestorChain;
use super::node::{Explored, Node, TraversalStatus};
use super::path::build_path;

/// Builds display trees over one heap.
/// Each call to [`TreeBuilder::build`] uses a fresh ancestor chain.
pub struct TreeBuilder<'a> {
    config: &'a ExploreConfig,
    classifier: Classifier<'a>,
}

/// Per-traversal mutable state.
struct Traversal {
    chain: AncestorChain,
    statuses: Vec<TraversalStatus>,
}

impl Traversal {
    fn report(&mut self, status: TraversalStatus) {
        debug!(%status, "traversal status");
        self.statuses.push(status);
    }
}

impl<'a> TreeBuilder<'a> {
    pub fn new(heap: &'a Heap, config: &'a ExploreConfig) -> Self {
        Self {
            config,
            classifier: Classifier::new(heap, &config.entry_module),
        }
    }

    /// Build the tree rooted at `root`. The root is always classified and
    /// shown; filters and limits apply only to its descendants.
    pub fn build(&self, key: Key, root: Value, root_path: &str) -> Explored {
        let mut traversal = Traversal {
            chain: AncestorChain::new(),
            statuses: Vec::new(),
        };

        let category = self.classifier.category(&root);
        let mut node = Node::new(key, root, category, root_path.to_string());

        if !category.is_scalar() {
            if let Some(id) = node.value.identity() {
                traversal.chain.push(id);
            }
            node.children = self.expand(&node.value, category, root_path, 0, &mut traversal);
        }

        info!(
            root = root_path,
            nodes = node.count(),
            statuses = traversal.statuses.len(),
            "tree built"
        );
        Explored {
            root: node,
            statuses: traversal.statuses,
        }
    }

    /// Turn a parent's entries into child nodes, recursing into containers.
    /// Children are only enumerated for parents that get expanded.
    fn expand(
        &self,
        parent: &Value,
        parent_category: Category,
        parent_path: &str,
        depth: usize,
        traversal: &mut Traversal,
    ) -> Vec<Node> {
        if !self.classifier.has_children(parent, parent_category) {
            return Vec::new();
        }
        if depth >= self.config.max_depth {
            traversal.report(TraversalStatus::DepthLimitReached {
                path: parent_path.to_string(),
            });
            return Vec::new();
        }

        let limit = self.config.max_children_per_node;
        let unfiltered = self.config.filter.includes_all();
        let mut nodes = Vec::new();
        for (key, value) in self.classifier.children(parent, parent_category) {
            // without a filter every remaining child would be dropped
            let category = if unfiltered && nodes.len() == limit {
                None
            } else {
                let category = self.classifier.category(&value);
                if !self.config.filter.includes(category) {
                    continue;
                }
                Some(category)
            };
            let Some(category) = category.filter(|_| nodes.len() < limit) else {
                traversal.report(TraversalStatus::FanoutLimitReached {
                    path: parent_path.to_string(),
                    limit,
                });
                break;
            };

            let path = build_path(&key, parent_category, parent_path);
            let mut node = Node::new(key, value, category, path);

            if !category.is_scalar() {
                if traversal.chain.is_ancestor(&node.value) {
                    node.is_cyclic = true;
                    traversal.report(TraversalStatus::CircularReference {
                        path: node.path.clone(),
                    });
                } else if let Some(id) = node.value.identity() {
                    traversal.chain.push(id);
                    node.children =
                        self.expand(&node.value, category, &node.path, depth + 1, traversal);
                    traversal.chain.pop();
                }
            }
            nodes.push(node);
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ShapeError;
    use crate::object::{Class, Data, Object, SequenceProtocol};
    use crate::tree::config::CategoryFilter;

    /// Host-defined sequence that counts every length and subscript call.
    #[derive(Debug)]
    struct Counted {
        len: usize,
        calls: Rc<Cell<usize>>,
    }

    impl SequenceProtocol for Counted {
        fn len(&self) -> Result<usize, ShapeError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.len)
        }

        fn get(&self, index: usize) -> Result<Value, ShapeError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Value::Int(index as i64))
        }
    }

    fn counted(heap: &mut Heap, len: usize) -> (Value, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let shape = Counted {
            len,
            calls: Rc::clone(&calls),
        };
        let id = heap.alloc(Object::new(
            Class::new("vendor.lib", "Counted"),
            Data::Custom(Box::new(shape)),
        ));
        (Value::Ref(id), calls)
    }

    fn build(heap: &Heap, config: &ExploreConfig, root: Value, root_path: &str) -> Explored {
        TreeBuilder::new(heap, config).build(Key::from(root_path), root, root_path)
    }

    /// `{"y": <EmptyClass with x = the dict itself>, "z": [1, 2, 3]}`
    fn cyclic_mapping(heap: &mut Heap) -> Value {
        let z = heap.list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let y = heap.instance(Class::new("__main__", "EmptyClass"));
        heap.set_attr(y, "v", Value::Int(4));
        let root = heap.dict(vec![(Key::from("y"), Value::Ref(y)), (Key::from("z"), Value::Ref(z))]);
        heap.set_attr(y, "x", root);
        Value::Ref(root)
    }

    #[test]
    fn test_cycle_is_flagged_and_siblings_expand() {
        let mut heap = Heap::new();
        let root = cyclic_mapping(&mut heap);
        let explored = build(&heap, &ExploreConfig::default(), root, "c");

        let x = explored.root.find("c['y'].x").expect("cyclic node present");
        assert!(x.is_cyclic);
        assert!(x.children.is_empty());
        assert_eq!(x.category, Category::Mapping);

        let z = explored.root.find("c['z']").expect("sibling present");
        assert!(!z.is_cyclic);
        assert_eq!(z.children.len(), 3);
        assert_eq!(z.children[2].path, "c['z'][2]");

        assert_eq!(explored.cyclic_paths(), vec!["c['y'].x"]);
        assert!(explored.statuses.contains(&TraversalStatus::CircularReference {
            path: "c['y'].x".to_string()
        }));
    }

    #[test]
    fn test_shared_but_acyclic_objects_expand_in_both_branches() {
        let mut heap = Heap::new();
        let shared = heap.list(vec![Value::Int(7)]);
        let root = heap.list(vec![Value::Ref(shared), Value::Ref(shared)]);
        let explored = build(&heap, &ExploreConfig::default(), Value::Ref(root), "r");

        assert!(explored.root.children.iter().all(|n| !n.is_cyclic));
        assert!(explored.root.children.iter().all(|n| n.children.len() == 1));
        assert!(explored.statuses.is_empty());
    }

    #[test]
    fn test_scalars_are_never_cyclic() {
        let mut heap = Heap::new();
        let inner = heap.list(vec![Value::Int(1)]);
        let root = heap.list(vec![Value::Int(1), Value::Ref(inner)]);
        let explored = build(&heap, &ExploreConfig::default(), Value::Ref(root), "r");
        assert!(explored.root.iter().all(|n| !n.is_cyclic));
    }

    #[test]
    fn test_fanout_limit_truncates_and_reports() {
        let mut heap = Heap::new();
        let items = (0..10).map(Value::Int).collect();
        let root = heap.list(items);
        let config = ExploreConfig {
            max_children_per_node: 4,
            ..Default::default()
        };
        let explored = build(&heap, &config, Value::Ref(root), "r");

        assert_eq!(explored.root.children.len(), 4);
        assert_eq!(
            explored.statuses,
            vec![TraversalStatus::FanoutLimitReached {
                path: "r".to_string(),
                limit: 4
            }]
        );
    }

    #[test]
    fn test_fanout_limit_not_reported_when_exactly_met() {
        let mut heap = Heap::new();
        let root = heap.list(vec![Value::Int(1), Value::Int(2)]);
        let config = ExploreConfig {
            max_children_per_node: 2,
            ..Default::default()
        };
        let explored = build(&heap, &config, Value::Ref(root), "r");
        assert_eq!(explored.root.children.len(), 2);
        assert!(explored.statuses.is_empty());
    }

    #[test]
    fn test_nodes_at_max_depth_have_no_children() {
        let mut heap = Heap::new();
        let deepest = heap.list(vec![Value::Int(1)]);
        let middle = heap.list(vec![Value::Ref(deepest)]);
        let root = heap.list(vec![Value::Ref(middle)]);

        for max_depth in 0..3 {
            let config = ExploreConfig {
                max_depth,
                ..Default::default()
            };
            let explored = build(&heap, &config, Value::Ref(root), "r");
            let depth_of = |path: &str| path.matches('[').count();
            for node in explored.root.iter() {
                if depth_of(&node.path) == max_depth {
                    assert!(node.children.is_empty(), "{} at depth {}", node.path, max_depth);
                }
            }
            assert!(explored
                .statuses
                .iter()
                .all(|s| matches!(s, TraversalStatus::DepthLimitReached { .. })));
            assert_eq!(explored.statuses.len(), 1);
        }
    }

    #[test]
    fn test_filtered_children_are_skipped_but_root_is_kept() {
        let mut heap = Heap::new();
        let list = heap.list(vec![Value::Int(1)]);
        let map = heap.dict(vec![(Key::from("k"), Value::Int(2))]);
        let root = heap.list(vec![Value::Ref(list), Value::Ref(map), Value::from("s")]);

        let config = ExploreConfig {
            filter: CategoryFilter::default().without(Category::Sequence),
            ..Default::default()
        };
        let explored = build(&heap, &config, Value::Ref(root), "r");

        // the root is a sequence and still shown
        assert_eq!(explored.root.category, Category::Sequence);
        let keys: Vec<String> = explored.root.children.iter().map(|n| n.key.to_string()).collect();
        assert_eq!(keys, vec!["1", "2"]);
        assert_eq!(explored.root.children[0].path, "r[1]");
    }

    #[test]
    fn test_filtered_children_do_not_count_toward_fanout() {
        let mut heap = Heap::new();
        let a = heap.list(vec![Value::Int(1)]);
        let b = heap.list(vec![Value::Int(2)]);
        let root = heap.list(vec![Value::Int(0), Value::Ref(a), Value::Int(0), Value::Ref(b)]);
        let config = ExploreConfig {
            max_children_per_node: 2,
            filter: CategoryFilter::default().without(Category::ScalarLike),
            ..Default::default()
        };
        let explored = build(&heap, &config, Value::Ref(root), "r");
        assert_eq!(explored.root.children.len(), 2);
        assert!(explored.statuses.is_empty());
    }

    #[test]
    fn test_scalar_root_has_no_children() {
        let heap = Heap::new();
        let explored = build(&heap, &ExploreConfig::default(), Value::Int(3), "n");
        assert_eq!(explored.root.category, Category::ScalarLike);
        assert!(explored.root.is_leaf());
    }

    #[test]
    fn test_instance_paths_use_attribute_access() {
        let mut heap = Heap::new();
        let b = heap.instance(Class::new("lib", "B"));
        heap.set_attr(b, "leaf", Value::Int(1));
        let a = heap.instance(Class::new("__main__", "A"));
        heap.set_attr(a, "b", b);

        let explored = build(&heap, &ExploreConfig::default(), Value::Ref(a), "a");
        assert_eq!(explored.root.category, Category::InstanceOwned);
        let leaf = explored.root.find("a.b.leaf").expect("attribute path");
        assert_eq!(leaf.value, Value::Int(1));
        assert_eq!(
            explored.root.find("a.b").map(|n| n.category),
            Some(Category::InstanceLibrary)
        );
    }

    #[test]
    fn test_direct_self_reference() {
        let mut heap = Heap::new();
        let l = heap.list(vec![Value::Int(1)]);
        if let crate::object::Data::List(items) = &mut heap.get_mut(l).data {
            items.push(Value::Ref(l));
        }
        let explored = build(&heap, &ExploreConfig::default(), Value::Ref(l), "l");
        let again = explored.root.find("l[1]").expect("self reference");
        assert!(again.is_cyclic);
        assert!(again.children.is_empty());
    }
    #[test]
    fn test_children_past_the_fanout_limit_are_not_inspected() {
        let mut heap = Heap::new();
        let (dropped, calls) = counted(&mut heap, 3);
        let root = heap.list(vec![Value::Int(1), Value::Int(2), dropped]);
        let config = ExploreConfig {
            max_children_per_node: 2,
            ..Default::default()
        };
        let explored = build(&heap, &config, Value::Ref(root), "r");

        assert_eq!(explored.root.children.len(), 2);
        assert_eq!(calls.get(), 0);
        assert_eq!(
            explored.statuses,
            vec![TraversalStatus::FanoutLimitReached {
                path: "r".to_string(),
                limit: 2
            }]
        );
    }

    #[test]
    fn test_children_at_the_depth_limit_are_not_enumerated() {
        let mut heap = Heap::new();
        let (shape, calls) = counted(&mut heap, 3);
        let root = heap.list(vec![shape]);
        let config = ExploreConfig {
            max_depth: 1,
            ..Default::default()
        };
        let explored = build(&heap, &config, Value::Ref(root), "r");

        let node = explored.root.find("r[0]").expect("host sequence shown");
        assert_eq!(node.category, Category::Sequence);
        assert!(node.children.is_empty());
        // one length call plus one subscript per index to settle the category
        assert_eq!(calls.get(), 4);
        assert_eq!(
            explored.statuses,
            vec![TraversalStatus::DepthLimitReached {
                path: "r[0]".to_string()
            }]
        );
    }

    #[test]
    fn test_filtered_fanout_still_reports_only_included_drops() {
        let mut heap = Heap::new();
        let a = heap.list(vec![Value::Int(1)]);
        let root = heap.list(vec![Value::Ref(a), Value::Int(0), Value::Int(0)]);
        let config = ExploreConfig {
            max_children_per_node: 1,
            filter: CategoryFilter::default().without(Category::ScalarLike),
            ..Default::default()
        };
        let explored = build(&heap, &config, Value::Ref(root), "r");
        assert_eq!(explored.root.children.len(), 1);
        assert!(explored.statuses.is_empty());
    }
}
