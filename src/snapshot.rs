//! JSON snapshots of object graphs
//!
//! A snapshot is a JSON object whose members become the namespace's
//! top-level names. Plain JSON maps onto builtin containers; tagged objects
//! describe everything else:
//!
//! | form                                        | object                       |
//! |---------------------------------------------|------------------------------|
//! | `null`, `true`, `1`, `1.5`, `"s"`           | immediate value              |
//! | `[...]` / `{"$list": [...]}`                | list                         |
//! | `{...}`                                     | dict with text keys          |
//! | `{"$dict": [[key, value], ...]}`            | dict with any keys           |
//! | `{"$tuple": [...]}`                         | tuple                        |
//! | `{"$bytes": "text"}`                        | bytearray                    |
//! | `{"$instance": {"class", "module", "attrs"}}` | attribute bag              |
//! | `{"$series": {"index", "values"}}`          | labelled series              |
//! | `{"$frame": {"index", "columns"}}`          | frame of series              |
//! | `{"$panel": {item: frame, ...}}`            | panel                        |
//! | `{"$ndarray": nested arrays}`               | N-D array                    |
//! | `{"$matrix": [[numbers], ...]}`             | 2-D matrix                   |
//! | `{"$ref": "name"}`                          | the object anchored as name  |
//!
//! Any object form other than `$ref` may also carry `"$id": "name"` to
//! become an anchor.
//! References may point forward, which is how cycles are written.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::error::SnapshotError;
use crate::object::{
    Class, Data, Heap, Key, Namespace, ObjId, Object, Value, array_object, panel_object,
    series_object,
};

const ANCHOR: &str = "$id";
const DEFAULT_MODULE: &str = "__main__";

/// Load a snapshot from a JSON document.
pub fn load_snapshot(text: &str) -> Result<Namespace, SnapshotError> {
    let json: Json = serde_json::from_str(text)?;
    Loader::default().load(&json)
}

pub fn load_snapshot_file(path: &Path) -> Result<Namespace, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_snapshot(&text)
}

#[derive(Default)]
struct Loader {
    heap: Heap,
    anchors: HashMap<String, ObjId>,
}

impl Loader {
    fn load(mut self, json: &Json) -> Result<Namespace, SnapshotError> {
        let Json::Object(members) = json else {
            return Err(SnapshotError::RootNotObject);
        };
        self.reserve_anchors(json)?;

        let mut attrs = Vec::new();
        for (name, value) in members {
            if name == ANCHOR {
                continue;
            }
            attrs.push((name.clone(), self.value(value)?));
        }
        let globals = Object::instance(Class::builtin("module")).with_attrs(attrs);
        let globals = self.place(anchor_of(members)?, globals);

        debug!(objects = self.heap.len(), anchors = self.anchors.len(), "snapshot loaded");
        Ok(Namespace::from_parts(self.heap, globals))
    }

    /// Allocate a placeholder for every `$id` so references can resolve
    /// before the anchored object is built.
    fn reserve_anchors(&mut self, json: &Json) -> Result<(), SnapshotError> {
        match json {
            Json::Array(items) => items.iter().try_for_each(|item| self.reserve_anchors(item)),
            Json::Object(members) => {
                if let Some(name) = anchor_of(members)? {
                    if self.anchors.contains_key(name) {
                        return Err(SnapshotError::DuplicateAnchor(name.to_string()));
                    }
                    let id = self.heap.alloc(Object::new(Class::builtin("object"), Data::Plain));
                    self.anchors.insert(name.to_string(), id);
                }
                members.values().try_for_each(|member| self.reserve_anchors(member))
            }
            _ => Ok(()),
        }
    }

    /// Store an object at its anchor's placeholder, or allocate it.
    fn place(&mut self, anchor: Option<&str>, object: Object) -> ObjId {
        match anchor.and_then(|name| self.anchors.get(name).copied()) {
            Some(id) => {
                self.heap.replace(id, object);
                id
            }
            None => self.heap.alloc(object),
        }
    }

    fn value(&mut self, json: &Json) -> Result<Value, SnapshotError> {
        Ok(match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => {
                let items = self.values(items)?;
                Value::Ref(self.heap.list(items))
            }
            Json::Object(members) => self.object(members)?,
        })
    }

    fn values(&mut self, items: &[Json]) -> Result<Vec<Value>, SnapshotError> {
        items.iter().map(|item| self.value(item)).collect()
    }

    fn object(&mut self, members: &Map<String, Json>) -> Result<Value, SnapshotError> {
        let anchor = anchor_of(members)?;
        let tag = members
            .iter()
            .find(|(name, _)| name.starts_with('$') && name.as_str() != ANCHOR);

        let object = match tag {
            None => {
                let mut entries = Vec::new();
                for (name, value) in members {
                    if name != ANCHOR {
                        entries.push((Key::Str(name.clone()), self.value(value)?));
                    }
                }
                Object::new(Class::builtin("dict"), Data::Dict(entries))
            }
            Some((tag, payload)) => match tag.as_str() {
                "$ref" if anchor.is_some() => {
                    return Err(invalid("$ref", "a reference cannot carry `$id`"));
                }
                "$ref" => return self.reference(payload),
                "$list" => {
                    let items = self.values(array(payload, "$list")?)?;
                    Object::new(Class::builtin("list"), Data::List(items))
                }
                "$tuple" => {
                    let items = self.values(array(payload, "$tuple")?)?;
                    Object::new(Class::builtin("tuple"), Data::Tuple(items))
                }
                "$bytes" => {
                    let text = payload.as_str().ok_or_else(|| invalid("$bytes", "expected a string"))?;
                    Object::new(Class::builtin("bytearray"), Data::Bytes(text.as_bytes().to_vec()))
                }
                "$dict" => self.dict(payload)?,
                "$instance" => self.instance(payload)?,
                "$series" => self.series(payload)?,
                "$frame" => self.frame(payload)?,
                "$panel" => self.panel(payload)?,
                "$ndarray" => self.ndarray(payload)?,
                "$matrix" => {
                    let cells = matrix_cells(payload)?;
                    self.heap.matrix_object(cells)
                }
                other => return Err(SnapshotError::UnknownTag(other.to_string())),
            },
        };
        Ok(Value::Ref(self.place(anchor, object)))
    }

    fn reference(&self, payload: &Json) -> Result<Value, SnapshotError> {
        let name = payload.as_str().ok_or_else(|| invalid("$ref", "expected an anchor name"))?;
        self.anchors
            .get(name)
            .map(|id| Value::Ref(*id))
            .ok_or_else(|| SnapshotError::DanglingRef(name.to_string()))
    }

    fn dict(&mut self, payload: &Json) -> Result<Object, SnapshotError> {
        let mut entries = Vec::new();
        for pair in array(payload, "$dict")? {
            match pair.as_array().map(Vec::as_slice) {
                Some([key, value]) => entries.push((json_key(key)?, self.value(value)?)),
                _ => return Err(invalid("$dict", "entries must be [key, value] pairs")),
            }
        }
        Ok(Object::new(Class::builtin("dict"), Data::Dict(entries)))
    }

    fn instance(&mut self, payload: &Json) -> Result<Object, SnapshotError> {
        let spec = payload.as_object().ok_or_else(|| invalid("$instance", "expected an object"))?;
        let name = spec
            .get("class")
            .and_then(Json::as_str)
            .ok_or_else(|| invalid("$instance", "missing `class`"))?;
        let module = spec.get("module").and_then(Json::as_str).unwrap_or(DEFAULT_MODULE);

        let mut attrs = Vec::new();
        if let Some(members) = spec.get("attrs") {
            let members = members.as_object().ok_or_else(|| invalid("$instance", "`attrs` must be an object"))?;
            for (attr, value) in members {
                attrs.push((attr.clone(), self.value(value)?));
            }
        }
        Ok(Object::instance(Class::new(module, name)).with_attrs(attrs))
    }

    fn series(&mut self, payload: &Json) -> Result<Object, SnapshotError> {
        let spec = payload.as_object().ok_or_else(|| invalid("$series", "expected an object"))?;
        let values = match spec.get("values") {
            Some(values) => self.values(array(values, "$series")?)?,
            None => Vec::new(),
        };
        let index = labels(spec.get("index"), values.len(), "$series")?;
        Ok(series_object(index, values))
    }

    fn frame(&mut self, payload: &Json) -> Result<Object, SnapshotError> {
        let spec = payload.as_object().ok_or_else(|| invalid("$frame", "expected an object"))?;
        let columns = match spec.get("columns") {
            Some(Json::Object(columns)) => columns,
            Some(_) => return Err(invalid("$frame", "`columns` must be an object")),
            None => return Ok(self.heap.frame_object(Vec::new(), Vec::new())),
        };

        let mut loaded = Vec::new();
        for (label, values) in columns {
            loaded.push((Key::Str(label.clone()), self.values(array(values, "$frame")?)?));
        }
        let rows = loaded.first().map_or(0, |(_, values)| values.len());
        if loaded.iter().any(|(_, values)| values.len() != rows) {
            return Err(invalid("$frame", "columns differ in length"));
        }
        let index = labels(spec.get("index"), rows, "$frame")?;
        Ok(self.heap.frame_object(index, loaded))
    }

    fn panel(&mut self, payload: &Json) -> Result<Object, SnapshotError> {
        let items = payload.as_object().ok_or_else(|| invalid("$panel", "expected an object"))?;
        let mut entries = Vec::new();
        for (label, frame) in items {
            entries.push((Key::Str(label.clone()), self.value(frame)?));
        }
        Ok(panel_object(entries))
    }

    fn ndarray(&mut self, payload: &Json) -> Result<Object, SnapshotError> {
        let items = array(payload, "$ndarray")?;
        let (shape, items) = self.array_level(items)?;
        Ok(array_object(shape, items))
    }

    /// Load one level of a nested array, returning its full shape.
    fn array_level(&mut self, items: &[Json]) -> Result<(Vec<usize>, Vec<Value>), SnapshotError> {
        let nested = items.iter().filter(|item| item.is_array()).count();
        if nested == 0 {
            return Ok((vec![items.len()], self.values(items)?));
        }
        if nested != items.len() {
            return Err(invalid("$ndarray", "mixes scalars and rows"));
        }

        let mut inner_shape: Option<Vec<usize>> = None;
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let row = item.as_array().map(Vec::as_slice).unwrap_or_default();
            let (shape, row_items) = self.array_level(row)?;
            if inner_shape.as_ref().is_some_and(|expected| *expected != shape) {
                return Err(invalid("$ndarray", "ragged rows"));
            }
            inner_shape = Some(shape.clone());
            values.push(Value::Ref(self.heap.alloc(array_object(shape, row_items))));
        }

        let mut shape = vec![items.len()];
        shape.extend(inner_shape.unwrap_or_default());
        Ok((shape, values))
    }
}

fn invalid(tag: &'static str, reason: &str) -> SnapshotError {
    SnapshotError::InvalidPayload {
        tag,
        reason: reason.to_string(),
    }
}

fn array<'j>(json: &'j Json, tag: &'static str) -> Result<&'j [Json], SnapshotError> {
    json.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| invalid(tag, "expected an array"))
}

fn anchor_of(members: &Map<String, Json>) -> Result<Option<&str>, SnapshotError> {
    match members.get(ANCHOR) {
        None => Ok(None),
        Some(Json::String(name)) => Ok(Some(name.as_str())),
        Some(_) => Err(invalid("$id", "anchor names must be strings")),
    }
}

/// Index labels, defaulting to `0..len`.
fn labels(index: Option<&Json>, len: usize, tag: &'static str) -> Result<Vec<Key>, SnapshotError> {
    match index {
        None => Ok((0..len).map(Key::from).collect()),
        Some(index) => {
            let keys = array(index, tag)?
                .iter()
                .map(json_key)
                .collect::<Result<Vec<_>, _>>()?;
            if keys.len() != len {
                return Err(invalid(tag, "index length differs from values"));
            }
            Ok(keys)
        }
    }
}

fn json_key(json: &Json) -> Result<Key, SnapshotError> {
    match json {
        Json::Null => Ok(Key::None),
        Json::Bool(b) => Ok(Key::Bool(*b)),
        Json::String(s) => Ok(Key::Str(s.clone())),
        Json::Number(n) => n
            .as_i64()
            .map(Key::Int)
            .ok_or_else(|| SnapshotError::InvalidKey(n.to_string())),
        Json::Array(items) => Ok(Key::Tuple(
            items.iter().map(json_key).collect::<Result<_, _>>()?,
        )),
        Json::Object(_) => Err(SnapshotError::InvalidKey(json.to_string())),
    }
}

fn matrix_cells(payload: &Json) -> Result<Vec<Vec<f64>>, SnapshotError> {
    let rows = array(payload, "$matrix")?
        .iter()
        .map(|row| {
            array(row, "$matrix")?
                .iter()
                .map(|cell| cell.as_f64().ok_or_else(|| invalid("$matrix", "cells must be numbers")))
                .collect::<Result<Vec<f64>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    if rows.windows(2).any(|pair| pair[0].len() != pair[1].len()) {
        return Err(invalid("$matrix", "ragged rows"));
    }
    Ok(rows)
}

/// The namespace shown when no snapshot is given: one `EmptyClass`
/// instance bound to `my_namespace`, covering every category.
pub fn demo_namespace() -> Namespace {
    let mut ns = Namespace::new();
    let heap = ns.heap_mut();
    let empty_class = Class::new(DEFAULT_MODULE, "EmptyClass");

    let my = heap.instance(empty_class.clone());
    heap.set_attr(my, "a", "Hello");

    let unsorted = ["a3", "1", "5", "11", "20", "a1", "a10"]
        .iter()
        .map(|s| Value::from(*s))
        .collect();
    let b = heap.list(unsorted);
    heap.set_attr(my, "b", b);

    let error_type = heap.instance(Class::new("builtins", "ArithmeticError"));
    let bb = heap.dict(vec![
        (Key::from("ArithmeticError"), Value::Ref(error_type)),
        (Key::from("str"), Value::from("str")),
    ]);
    heap.set_attr(my, "bb", bb);

    let zy = heap.dict(vec![(Key::from("z"), Value::Int(3)), (Key::from("y"), Value::Int(9))]);
    let z = heap.array2(vec![
        vec![Value::Int(1), Value::from("a")],
        vec![Value::Int(2), Value::Ref(zy)],
    ]);
    let y = heap.dict(vec![(Key::from("z"), Value::Int(3)), (Key::from("y"), Value::Int(9))]);
    let cc = heap.dict(vec![(Key::from("z"), Value::Ref(z)), (Key::from("y"), Value::Ref(y))]);
    heap.set_attr(my, "cc", cc);

    let c_y = heap.instance(empty_class);
    let c = heap.dict(vec![
        (Key::from("y"), Value::Ref(c_y)),
        (Key::Int(5), Value::from("q")),
        (Key::Tuple(vec![Key::Int(4), Key::Int(5)]), Value::from("t")),
    ]);
    let numbers = heap.list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    heap.set_attr(c_y, "z", numbers);
    heap.set_attr(c_y, "y", Value::Int(4));
    heap.set_attr(c_y, "x", c);
    heap.set_attr(my, "c", c);

    let d = heap.matrix(vec![
        vec![11.0, 12.0, 13.0],
        vec![14.0, 15.0, 16.0],
        vec![17.0, 18.0, 19.0],
    ]);
    heap.set_attr(my, "d", d);

    let e = heap.array2(
        [[1, 2, 3], [4, 5, 6], [7, 8, 9]]
            .iter()
            .map(|row| row.iter().map(|n| Value::Int(*n)).collect())
            .collect(),
    );
    heap.set_attr(my, "e", e);

    let index: Vec<Key> = ["a", "b", "c", "d", "e"].iter().map(|s| Key::from(*s)).collect();
    let samples: Vec<Value> = [0.4691, -0.2829, -1.5091, -1.1356, 1.2121]
        .iter()
        .map(|x| Value::Float(*x))
        .collect();
    let s = heap.series(index.clone(), samples.clone());
    heap.set_attr(my, "s", s);
    let df = heap.frame(
        index,
        vec![(Key::from("one"), samples.clone()), (Key::from("two"), samples)],
    );
    heap.set_attr(my, "df", df);

    heap.set_attr(my, "n", Value::Int(8));
    let o = heap.bytearray(b"hello".to_vec());
    heap.set_attr(my, "o", o);

    ns.set_global("__name__", DEFAULT_MODULE);
    ns.set_global("my_namespace", my);
    ns
}
