//! Textual rendering of values for previews

use super::heap::{Data, Heap, ObjId, TableKind, Value};
use super::key::{Key, quote};

/// Marker written where rendering stops.
pub const ELLIPSIS: &str = "...";

/// Bounds on how much of a value gets rendered.
///
/// Object graphs can nest arbitrarily deep and share subobjects, so the
/// text of a full rendering has no useful upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReprLimits {
    /// Containers nested deeper than this render as `[...]` / `{...}`.
    pub max_depth: usize,
    /// Rendering stops once the text reaches this many bytes.
    pub max_len: usize,
    /// Rendering stops before the line break that would exceed this count.
    pub max_lines: usize,
}

impl Default for ReprLimits {
    fn default() -> Self {
        Self {
            max_depth: 12,
            max_len: 2048,
            max_lines: 64,
        }
    }
}

/// Render a value the way an interactive interpreter would echo it.
/// Containers that contain themselves render the inner occurrence as
/// `[...]` / `{...}`.
pub fn repr(heap: &Heap, value: &Value) -> String {
    repr_with(heap, value, ReprLimits::default())
}

/// Like [`repr`], cut short with [`ELLIPSIS`] once `limits` are spent.
pub fn repr_with(heap: &Heap, value: &Value, limits: ReprLimits) -> String {
    let mut renderer = Renderer {
        heap,
        limits,
        active: Vec::new(),
        out: String::new(),
        lines: 0,
        cut: false,
    };
    renderer.value(value);
    renderer.out
}

pub fn repr_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{:?}", x)
    }
}

struct Renderer<'a> {
    heap: &'a Heap,
    limits: ReprLimits,
    /// Objects on the current rendering path.
    active: Vec<ObjId>,
    out: String,
    lines: usize,
    /// Set once the budget ran out; later writes are dropped.
    cut: bool,
}

impl<'a> Renderer<'a> {
    fn push(&mut self, text: &str) {
        if self.cut {
            return;
        }
        let mut end = text.len().min(self.limits.max_len.saturating_sub(self.out.len()));
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        for (at, _) in text[..end].match_indices('\n') {
            if self.lines == self.limits.max_lines {
                end = at;
                break;
            }
            self.lines += 1;
        }
        self.out.push_str(&text[..end]);
        if end < text.len() {
            self.out.push_str(ELLIPSIS);
            self.cut = true;
        }
    }

    /// True when `id` is already being rendered or nesting is too deep.
    fn stop_at(&self, id: ObjId) -> bool {
        self.active.contains(&id) || self.active.len() >= self.limits.max_depth
    }

    fn value(&mut self, value: &Value) {
        if self.cut {
            return;
        }
        match value {
            Value::None => self.push("None"),
            Value::Bool(true) => self.push("True"),
            Value::Bool(false) => self.push("False"),
            Value::Int(i) => self.push(&i.to_string()),
            Value::Float(x) => self.push(&repr_float(*x)),
            Value::Str(s) => self.push(&quote(s)),
            Value::Ref(id) => {
                if self.stop_at(*id) {
                    self.push(recursion_marker(self.heap, *id));
                    return;
                }
                self.active.push(*id);
                self.object(*id);
                self.active.pop();
            }
        }
    }

    fn object(&mut self, id: ObjId) {
        let heap = self.heap;
        let object = heap.get(id);
        match &object.data {
            Data::List(items) => {
                self.push("[");
                self.items(items);
                self.push("]");
            }
            Data::Tuple(items) => {
                self.push("(");
                self.items(items);
                self.push(if items.len() == 1 { ",)" } else { ")" });
            }
            Data::Bytes(bytes) => self.push(&format!("bytearray(b{})", bytes_literal(bytes))),
            Data::Dict(entries) => {
                self.push("{");
                for (i, (k, v)) in entries.iter().enumerate() {
                    if self.cut {
                        break;
                    }
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push(&k.repr());
                    self.push(": ");
                    self.value(v);
                }
                self.push("}");
            }
            Data::Table {
                kind: TableKind::Series,
                entries,
            } => {
                for (i, (k, v)) in entries.iter().enumerate() {
                    if self.cut {
                        break;
                    }
                    if i > 0 {
                        self.push("\n");
                    }
                    self.push(&format!("{}    ", k));
                    self.value(v);
                }
            }
            Data::Table {
                kind: TableKind::Frame,
                entries,
            } => self.frame(entries),
            Data::Table {
                kind: TableKind::Panel,
                entries,
            } => {
                let labels: Vec<String> = entries.iter().map(|(k, _)| k.to_string()).collect();
                self.push(&format!(
                    "<class '{}'>\nItems axis: {}",
                    object.class.qualified_name(),
                    labels.join(", ")
                ));
            }
            Data::Array { items, .. } => {
                self.push("array(");
                self.array_body(items, 7);
                self.push(")");
            }
            Data::Matrix { cells, .. } => {
                self.push("matrix([");
                for (i, row) in cells.iter().enumerate() {
                    if self.cut {
                        break;
                    }
                    if i > 0 {
                        self.push(",\n        ");
                    }
                    let row: Vec<String> = row.iter().map(|x| repr_float(*x)).collect();
                    self.push(&format!("[{}]", row.join(", ")));
                }
                self.push("])");
            }
            Data::Plain | Data::Custom(_) => {
                self.push(&format!("<{} object at {}>", object.class.qualified_name(), id))
            }
        }
    }

    fn items(&mut self, items: &[Value]) {
        for (i, v) in items.iter().enumerate() {
            if self.cut {
                break;
            }
            if i > 0 {
                self.push(", ");
            }
            self.value(v);
        }
    }

    /// Nested array body; rows of a multi-dimensional array go on separate
    /// lines aligned under the opening bracket.
    fn array_body(&mut self, items: &[Value], indent: usize) {
        let heap = self.heap;
        let nested = items.iter().any(|v| {
            v.identity()
                .is_some_and(|id| matches!(heap.get(id).data, Data::Array { .. }))
        });
        let separator = if nested {
            format!(",\n{}", " ".repeat(indent))
        } else {
            ", ".to_string()
        };
        self.push("[");
        for (i, v) in items.iter().enumerate() {
            if self.cut {
                break;
            }
            if i > 0 {
                self.push(&separator);
            }
            match v.identity() {
                Some(id) if !self.stop_at(id) => match &heap.get(id).data {
                    Data::Array { items, .. } => {
                        self.active.push(id);
                        self.array_body(items, indent + 1);
                        self.active.pop();
                    }
                    _ => self.value(v),
                },
                _ => self.value(v),
            }
        }
        self.push("]");
    }

    fn frame(&mut self, columns: &[(Key, Value)]) {
        let heap = self.heap;
        let header: Vec<String> = columns.iter().map(|(k, _)| k.to_string()).collect();
        self.push(&format!("    {}", header.join("  ")));

        let series: Vec<&[(Key, Value)]> = columns
            .iter()
            .filter_map(|(_, v)| v.identity())
            .filter_map(|id| match &heap.get(id).data {
                Data::Table { entries, .. } => Some(entries.as_slice()),
                _ => None,
            })
            .collect();

        let Some(first) = series.first() else {
            return;
        };
        for (row, (label, _)) in first.iter().enumerate() {
            if self.cut {
                break;
            }
            self.push(&format!("\n{}   ", label));
            for (column, cells) in series.iter().enumerate() {
                if column > 0 {
                    self.push("  ");
                }
                if let Some((_, v)) = cells.get(row) {
                    self.value(v);
                }
            }
        }
    }
}

fn recursion_marker(heap: &Heap, id: ObjId) -> &'static str {
    match heap.get(id).data {
        Data::List(_) => "[...]",
        Data::Dict(_) => "{...}",
        Data::Tuple(_) => "(...)",
        _ => ELLIPSIS,
    }
}

fn bytes_literal(bytes: &[u8]) -> String {
    let mut out = String::from("'");
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\n' => out.push_str("\\n"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push('\'');
    out
}
