//! Arena-backed object graph

use std::fmt;

use serde::Serialize;

use crate::error::ShapeError;

use super::key::Key;

/// Handle to an object stored in a [`Heap`]. Two values are the same object
/// exactly when their handles are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjId(usize);

impl ObjId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// A value as seen by the explorer: an immediate scalar or a reference to a
/// heap object. Immediates carry no identity.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Ref(ObjId),
}

impl Value {
    /// Object identity, if this value refers to a heap object.
    pub fn identity(&self) -> Option<ObjId> {
        match self {
            Value::Ref(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ObjId> for Value {
    fn from(id: ObjId) -> Self {
        Value::Ref(id)
    }
}

/// The type of an object and the module it was defined in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Class {
    pub module: String,
    pub name: String,
}

pub const BUILTINS: &str = "builtins";

impl Class {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new(BUILTINS, name)
    }

    pub fn is_builtin(&self) -> bool {
        self.module == BUILTINS
    }

    /// `list` for builtins, `module.Name` otherwise.
    pub fn qualified_name(&self) -> String {
        if self.is_builtin() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }
}

/// Labelled tabular containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// 1-D labelled values
    Series,
    /// 2-D, one entry per column
    Frame,
    /// N-D, one entry per item
    Panel,
}

/// A host-defined shape that supports a length and integer subscripting,
/// either of which may fail.
pub trait SequenceProtocol: fmt::Debug {
    fn len(&self) -> Result<usize, ShapeError>;

    fn get(&self, index: usize) -> Result<Value, ShapeError>;
}

/// Shape payload of a heap object.
#[derive(Debug)]
pub enum Data {
    /// Nothing enumerable beyond the attribute store.
    Plain,
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Bytes(Vec<u8>),
    /// Entries in insertion order.
    Dict(Vec<(Key, Value)>),
    Table {
        kind: TableKind,
        entries: Vec<(Key, Value)>,
    },
    /// N-D array; `items` run along the first axis.
    Array {
        shape: Vec<usize>,
        items: Vec<Value>,
    },
    /// 2-D numeric matrix. Indexing a row yields another (1-row) matrix,
    /// held in `rows`.
    Matrix {
        cells: Vec<Vec<f64>>,
        rows: Vec<ObjId>,
    },
    Custom(Box<dyn SequenceProtocol>),
}

/// A heap object: its class, its shape payload and an optional attribute
/// store. `attrs == None` means the object has no attribute store at all.
#[derive(Debug)]
pub struct Object {
    pub class: Class,
    pub data: Data,
    pub attrs: Option<Vec<(String, Value)>>,
}

impl Object {
    pub fn new(class: Class, data: Data) -> Self {
        Self {
            class,
            data,
            attrs: None,
        }
    }

    /// Plain attribute bag of the given class.
    pub fn instance(class: Class) -> Self {
        Self {
            class,
            data: Data::Plain,
            attrs: Some(Vec::new()),
        }
    }

    pub fn with_attrs(mut self, attrs: Vec<(String, Value)>) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs
            .as_ref()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Set or replace an attribute, creating the store if needed.
    /// New names keep insertion order.
    pub fn set_attr(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let attrs = self.attrs.get_or_insert_with(Vec::new);
        match attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => attrs.push((name, value)),
        }
    }
}

/// Arena holding every object of an explored graph. Objects reference one
/// another by [`ObjId`], so cycles need no special handling.
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<Object>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn alloc(&mut self, object: Object) -> ObjId {
        self.objects.push(object);
        ObjId(self.objects.len() - 1)
    }

    /// Replace the object behind an existing handle.
    pub fn replace(&mut self, id: ObjId, object: Object) {
        self.objects[id.0] = object;
    }

    /// Handles are only minted by this heap, so lookups always succeed.
    pub fn get(&self, id: ObjId) -> &Object {
        &self.objects[id.0]
    }

    pub fn get_mut(&mut self, id: ObjId) -> &mut Object {
        &mut self.objects[id.0]
    }

    pub fn set_attr(&mut self, id: ObjId, name: impl Into<String>, value: impl Into<Value>) {
        self.get_mut(id).set_attr(name, value.into());
    }

    pub fn list(&mut self, items: Vec<Value>) -> ObjId {
        self.alloc(Object::new(Class::builtin("list"), Data::List(items)))
    }

    pub fn tuple(&mut self, items: Vec<Value>) -> ObjId {
        self.alloc(Object::new(Class::builtin("tuple"), Data::Tuple(items)))
    }

    pub fn bytearray(&mut self, bytes: impl Into<Vec<u8>>) -> ObjId {
        self.alloc(Object::new(
            Class::builtin("bytearray"),
            Data::Bytes(bytes.into()),
        ))
    }

    pub fn dict(&mut self, entries: Vec<(Key, Value)>) -> ObjId {
        self.alloc(Object::new(Class::builtin("dict"), Data::Dict(entries)))
    }

    pub fn instance(&mut self, class: Class) -> ObjId {
        self.alloc(Object::instance(class))
    }

    pub fn series(&mut self, index: Vec<Key>, values: Vec<Value>) -> ObjId {
        self.alloc(series_object(index, values))
    }

    /// Frame whose columns share one index; each column becomes a series.
    pub fn frame(&mut self, index: Vec<Key>, columns: Vec<(Key, Vec<Value>)>) -> ObjId {
        let object = self.frame_object(index, columns);
        self.alloc(object)
    }

    pub fn frame_object(&mut self, index: Vec<Key>, columns: Vec<(Key, Vec<Value>)>) -> Object {
        let entries = columns
            .into_iter()
            .map(|(label, values)| {
                let column = self.series(index.clone(), values);
                (label, Value::Ref(column))
            })
            .collect();
        Object::new(
            Class::new("pandas.core.frame", "DataFrame"),
            Data::Table {
                kind: TableKind::Frame,
                entries,
            },
        )
    }

    pub fn panel(&mut self, items: Vec<(Key, Value)>) -> ObjId {
        self.alloc(panel_object(items))
    }

    /// 1-D array of immediate values.
    pub fn array(&mut self, items: Vec<Value>) -> ObjId {
        let shape = vec![items.len()];
        self.alloc(array_object(shape, items))
    }

    /// 2-D array; every row becomes its own 1-D array object.
    pub fn array2(&mut self, rows: Vec<Vec<Value>>) -> ObjId {
        let width = rows.first().map_or(0, Vec::len);
        let shape = vec![rows.len(), width];
        let items = rows
            .into_iter()
            .map(|row| Value::Ref(self.array(row)))
            .collect();
        self.alloc(array_object(shape, items))
    }

    pub fn matrix(&mut self, cells: Vec<Vec<f64>>) -> ObjId {
        let object = self.matrix_object(cells);
        self.alloc(object)
    }

    /// Build a matrix and allocate its row views. A row view is a 1-row
    /// matrix whose own row 0 is itself.
    pub fn matrix_object(&mut self, cells: Vec<Vec<f64>>) -> Object {
        let rows = cells
            .iter()
            .map(|row| {
                let id = self.alloc(matrix_with_rows(vec![row.clone()], Vec::new()));
                if let Data::Matrix { rows, .. } = &mut self.get_mut(id).data {
                    rows.push(id);
                }
                id
            })
            .collect();
        matrix_with_rows(cells, rows)
    }
}

pub fn series_object(index: Vec<Key>, values: Vec<Value>) -> Object {
    Object::new(
        Class::new("pandas.core.series", "Series"),
        Data::Table {
            kind: TableKind::Series,
            entries: index.into_iter().zip(values).collect(),
        },
    )
}

/// Panel keyed by item label; each item is usually a frame.
pub fn panel_object(items: Vec<(Key, Value)>) -> Object {
    Object::new(
        Class::new("pandas.core.panel", "Panel"),
        Data::Table {
            kind: TableKind::Panel,
            entries: items,
        },
    )
}

pub fn array_object(shape: Vec<usize>, items: Vec<Value>) -> Object {
    Object::new(Class::new("numpy", "ndarray"), Data::Array { shape, items })
}

fn matrix_with_rows(cells: Vec<Vec<f64>>, rows: Vec<ObjId>) -> Object {
    Object::new(Class::new("numpy", "matrix"), Data::Matrix { cells, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_replaces_and_keeps_order() {
        let mut obj = Object::instance(Class::new("__main__", "Thing"));
        obj.set_attr("a", Value::Int(1));
        obj.set_attr("b", Value::Int(2));
        obj.set_attr("a", Value::Int(3));

        let attrs = obj.attrs.as_ref().expect("instance has attrs");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0], ("a".to_string(), Value::Int(3)));
        assert_eq!(obj.attr("b"), Some(&Value::Int(2)));
        assert_eq!(obj.attr("missing"), None);
    }

    #[test]
    fn test_builtins_have_no_attribute_store() {
        let mut heap = Heap::new();
        let list = heap.list(vec![Value::Int(1)]);
        assert!(heap.get(list).attrs.is_none());
        assert_eq!(heap.get(list).attr("anything"), None);
    }

    #[test]
    fn test_matrix_rows_are_self_referential_views() {
        let mut heap = Heap::new();
        let m = heap.matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        let Data::Matrix { rows, .. } = &heap.get(m).data else {
            panic!("expected matrix");
        };
        assert_eq!(rows.len(), 2);

        let row = rows[0];
        let Data::Matrix { cells, rows } = &heap.get(row).data else {
            panic!("expected matrix row view");
        };
        assert_eq!(cells, &vec![vec![1.0, 2.0]]);
        assert_eq!(rows, &vec![row]);
    }

    #[test]
    fn test_array2_shape() {
        let mut heap = Heap::new();
        let a = heap.array2(vec![
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
            vec![Value::Int(4), Value::Int(5), Value::Int(6)],
        ]);
        let Data::Array { shape, items } = &heap.get(a).data else {
            panic!("expected array");
        };
        assert_eq!(shape, &vec![2, 3]);
        assert!(items.iter().all(|v| v.identity().is_some()));
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(Class::builtin("dict").qualified_name(), "dict");
        assert_eq!(
            Class::new("__main__", "EmptyClass").qualified_name(),
            "__main__.EmptyClass"
        );
    }
}
