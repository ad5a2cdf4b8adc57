//! Display rows for explored nodes

use serde::Serialize;

use crate::natural::natural_key;
use crate::object::{Data, Heap, ReprLimits, TableKind, Value, repr_with};
use crate::tree::{Category, Node};

use super::config::SortColumn;

/// Previews longer than this many lines are cut and marked with `...`.
pub const PREVIEW_LINES: usize = 3;

/// One row of the display: the text of each column for a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRow {
    pub key: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub category: Category,
    pub size: String,
    pub preview: String,
    pub path: String,
}

impl NodeRow {
    pub fn column(&self, column: SortColumn) -> &str {
        match column {
            SortColumn::Key => &self.key,
            SortColumn::Type => &self.type_name,
            SortColumn::Category => self.category.as_str(),
            SortColumn::Size => &self.size,
            SortColumn::Value => &self.preview,
        }
    }
}

/// Display tree: rows with their children, ordered for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayNode {
    #[serde(flatten)]
    pub row: NodeRow,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cyclic: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    /// Describe `node` and its descendants, natural-sorting siblings by
    /// `sort` when given.
    pub fn from_node(heap: &Heap, node: &Node, sort: Option<SortColumn>) -> Self {
        let mut children: Vec<DisplayNode> = node
            .children
            .iter()
            .map(|child| DisplayNode::from_node(heap, child, sort))
            .collect();
        if let Some(column) = sort {
            children.sort_by_cached_key(|child| natural_key(child.row.column(column)));
        }
        Self {
            row: describe(heap, node),
            cyclic: node.is_cyclic,
            children,
        }
    }

    pub fn count(&self) -> usize {
        1 + self.children.iter().map(DisplayNode::count).sum::<usize>()
    }
}

pub fn describe(heap: &Heap, node: &Node) -> NodeRow {
    NodeRow {
        key: node.key.to_string(),
        type_name: type_name(heap, &node.value),
        category: node.category,
        size: size_descriptor(heap, &node.value),
        preview: truncate_preview(&preview(heap, &node.value)),
        path: node.path.clone(),
    }
}

/// Rendering stops one line past the preview so the cut is still marked.
fn preview(heap: &Heap, value: &Value) -> String {
    let limits = ReprLimits {
        max_lines: PREVIEW_LINES + 1,
        ..ReprLimits::default()
    };
    repr_with(heap, value, limits)
}

pub fn type_name(heap: &Heap, value: &Value) -> String {
    match value {
        Value::None => "NoneType".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Int(_) => "int".to_string(),
        Value::Float(_) => "float".to_string(),
        Value::Str(_) => "str".to_string(),
        Value::Ref(id) => heap.get(*id).class.qualified_name(),
    }
}

/// Shape for arrays, length for sized containers, `none` otherwise.
pub fn size_descriptor(heap: &Heap, value: &Value) -> String {
    let len = match value {
        Value::Str(s) => s.chars().count(),
        Value::Ref(id) => match &heap.get(*id).data {
            Data::Array { shape, .. } => return shape_text(shape),
            Data::Matrix { cells, .. } => {
                return shape_text(&[cells.len(), cells.first().map_or(0, Vec::len)]);
            }
            Data::List(items) | Data::Tuple(items) => items.len(),
            Data::Bytes(bytes) => bytes.len(),
            Data::Dict(entries) => entries.len(),
            Data::Table {
                kind: TableKind::Frame,
                entries,
            } => frame_rows(heap, entries.first().map(|(_, column)| column)),
            Data::Table { entries, .. } => entries.len(),
            Data::Custom(shape) => match shape.len() {
                Ok(len) => len,
                Err(_) => return "none".to_string(),
            },
            Data::Plain => return "none".to_string(),
        },
        _ => return "none".to_string(),
    };
    len.to_string()
}

fn frame_rows(heap: &Heap, first_column: Option<&Value>) -> usize {
    first_column
        .and_then(Value::identity)
        .map_or(0, |id| match &heap.get(id).data {
            Data::Table { entries, .. } => entries.len(),
            _ => 0,
        })
}

fn shape_text(shape: &[usize]) -> String {
    let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
    if dims.len() == 1 {
        format!("({},)", dims[0])
    } else {
        format!("({})", dims.join(", "))
    }
}

/// Keep the first lines of a preview, appending `...` when more follow.
pub fn truncate_preview(text: &str) -> String {
    if text.matches('\n').count() > PREVIEW_LINES {
        let head: Vec<&str> = text.split('\n').take(PREVIEW_LINES).collect();
        format!("{}\n...", head.join("\n"))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Class, Key};
    use crate::tree::{ExploreConfig, TreeBuilder};

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate_preview("one line"), "one line");
        assert_eq!(truncate_preview("a\nb\nc\nd"), "a\nb\nc\nd");
        assert_eq!(truncate_preview("a\nb\nc\nd\ne"), "a\nb\nc\n...");
    }

    #[test]
    fn test_size_descriptors() {
        let mut heap = Heap::new();
        let list = heap.list(vec![Value::Int(1), Value::Int(2)]);
        let arr = heap.array2(vec![vec![Value::Int(1)], vec![Value::Int(2)]]);
        let vector = heap.array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let m = heap.matrix(vec![vec![1.0, 2.0, 3.0]]);
        let obj = heap.instance(Class::new("__main__", "Thing"));
        let df = heap.frame(
            vec![Key::Int(0), Key::Int(1), Key::Int(2)],
            vec![(Key::from("one"), vec![Value::Int(1), Value::Int(2), Value::Int(3)])],
        );

        assert_eq!(size_descriptor(&heap, &Value::Ref(list)), "2");
        assert_eq!(size_descriptor(&heap, &Value::Ref(arr)), "(2, 1)");
        assert_eq!(size_descriptor(&heap, &Value::Ref(vector)), "(3,)");
        assert_eq!(size_descriptor(&heap, &Value::Ref(m)), "(1, 3)");
        assert_eq!(size_descriptor(&heap, &Value::Ref(obj)), "none");
        assert_eq!(size_descriptor(&heap, &Value::Ref(df)), "3");
        assert_eq!(size_descriptor(&heap, &Value::from("hello")), "5");
        assert_eq!(size_descriptor(&heap, &Value::Int(8)), "none");
    }

    #[test]
    fn test_type_names() {
        let mut heap = Heap::new();
        let obj = heap.instance(Class::new("__main__", "EmptyClass"));
        assert_eq!(type_name(&heap, &Value::Ref(obj)), "__main__.EmptyClass");
        assert_eq!(type_name(&heap, &Value::None), "NoneType");
        assert_eq!(type_name(&heap, &Value::Float(1.0)), "float");
    }

    #[test]
    fn test_children_are_naturally_sorted() {
        let mut heap = Heap::new();
        let root = heap.dict(
            ["a3", "1", "5", "11", "20", "a1", "a10"]
                .iter()
                .map(|k| (Key::from(*k), Value::Int(0)))
                .collect(),
        );
        let config = ExploreConfig::default();
        let explored = TreeBuilder::new(&heap, &config).build(Key::from("d"), Value::Ref(root), "d");

        let sorted = DisplayNode::from_node(&heap, &explored.root, Some(SortColumn::Key));
        let keys: Vec<&str> = sorted.children.iter().map(|c| c.row.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "5", "11", "20", "a1", "a3", "a10"]);

        let unsorted = DisplayNode::from_node(&heap, &explored.root, None);
        let keys: Vec<&str> = unsorted.children.iter().map(|c| c.row.key.as_str()).collect();
        assert_eq!(keys, vec!["a3", "1", "5", "11", "20", "a1", "a10"]);
        assert_eq!(unsorted.count(), 8);
    }

    #[test]
    fn test_describe_row() {
        let mut heap = Heap::new();
        let list = heap.list(vec![Value::Int(1), Value::from("a")]);
        let config = ExploreConfig::default();
        let explored = TreeBuilder::new(&heap, &config).build(Key::from("l"), Value::Ref(list), "l");

        let row = describe(&heap, &explored.root);
        assert_eq!(row.key, "l");
        assert_eq!(row.type_name, "list");
        assert_eq!(row.category, Category::Sequence);
        assert_eq!(row.size, "2");
        assert_eq!(row.preview, "[1, 'a']");
        assert_eq!(row.path, "l");

        let child = describe(&heap, &explored.root.children[1]);
        assert_eq!(child.key, "1");
        assert_eq!(child.path, "l[1]");
        assert_eq!(child.preview, "'a'");
    }
    #[test]
    fn test_describe_cuts_long_previews() {
        let mut heap = Heap::new();
        let series = heap.series(
            (0..1000).map(Key::Int).collect(),
            (0..1000).map(|i| Value::Int(i * 10)).collect(),
        );
        let mut chain = heap.list(Vec::new());
        for _ in 0..100_000 {
            chain = heap.list(vec![Value::Ref(chain)]);
        }
        let config = ExploreConfig {
            max_depth: 0,
            ..ExploreConfig::default()
        };
        let builder = TreeBuilder::new(&heap, &config);

        let explored = builder.build(Key::from("s"), Value::Ref(series), "s");
        assert_eq!(
            describe(&heap, &explored.root).preview,
            "0    0\n1    10\n2    20\n..."
        );

        let explored = builder.build(Key::from("c"), Value::Ref(chain), "c");
        let preview = describe(&heap, &explored.root).preview;
        assert!(preview.starts_with("[[[["));
        assert!(preview.contains("[...]"));
    }
}
