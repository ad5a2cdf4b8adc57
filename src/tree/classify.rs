//! Value classification
//!
//! Decides which [`Category`] a value belongs to and enumerates its children.
//! Rules are tried in a fixed order because the shapes overlap: a frame is
//! also sized and indexable, a matrix row indexes back to itself, and an
//! empty list still counts as a plain object.

use tracing::debug;

use crate::error::ShapeError;
use crate::object::{Data, Heap, Key, Value};

use super::category::Category;

/// Category of a value and its `(key, value)` children in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub children: Vec<(Key, Value)>,
}

impl Classification {
    fn new(category: Category, children: Vec<(Key, Value)>) -> Self {
        Self { category, children }
    }
}

/// Classifies values of one heap. The entry module is injected so that
/// "owned" instances do not depend on ambient process state.
pub struct Classifier<'a> {
    heap: &'a Heap,
    entry_module: &'a str,
}

impl<'a> Classifier<'a> {
    pub fn new(heap: &'a Heap, entry_module: &'a str) -> Self {
        Self { heap, entry_module }
    }

    /// Classify without mutating the value. Shape errors never escape:
    /// they only disqualify the sequence rule.
    pub fn classify(&self, value: &Value) -> Classification {
        let category = self.category(value);
        Classification::new(category, self.children(value, category))
    }

    /// The category alone. Built-in shapes are decided from their lengths
    /// without copying anything. A host-defined sequence still has every
    /// index fetched, since one failing subscript disqualifies it.
    pub fn category(&self, value: &Value) -> Category {
        let Some(id) = value.identity() else {
            return Category::ScalarLike;
        };
        let object = self.heap.get(id);

        match &object.data {
            Data::Dict(_) | Data::Table { .. } => return Category::Mapping,
            Data::Matrix { cells, .. } if is_degenerate_matrix(cells) => {
                return Category::ScalarLike;
            }
            _ => {}
        }

        match sequence_len(&object.data) {
            Ok(Some(len)) if len > 0 => return Category::Sequence,
            Ok(_) => {}
            Err(err) => {
                debug!(object = %id, class = %object.class.qualified_name(), error = %err, "not usable as a sequence");
            }
        }

        match &object.attrs {
            None => Category::ScalarLike,
            Some(_) if object.class.module == self.entry_module => Category::InstanceOwned,
            Some(_) => Category::InstanceLibrary,
        }
    }

    /// `(key, value)` children of a value already classified as `category`.
    pub fn children(&self, value: &Value, category: Category) -> Vec<(Key, Value)> {
        let Some(id) = value.identity() else {
            return Vec::new();
        };
        let object = self.heap.get(id);

        match (category, &object.data) {
            (Category::Mapping, Data::Dict(entries) | Data::Table { entries, .. }) => {
                entries.clone()
            }
            (Category::Sequence, data) => match sequence_items(data) {
                Ok(items) => items.unwrap_or_default(),
                Err(err) => {
                    debug!(object = %id, error = %err, "sequence changed while enumerating");
                    Vec::new()
                }
            },
            (Category::InstanceOwned | Category::InstanceLibrary, _) => object
                .attrs
                .iter()
                .flatten()
                .map(|(name, value)| (Key::Str(name.clone()), value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether [`Classifier::children`] would return anything.
    pub fn has_children(&self, value: &Value, category: Category) -> bool {
        let Some(id) = value.identity() else {
            return false;
        };
        let object = self.heap.get(id);

        match (category, &object.data) {
            (Category::Mapping, Data::Dict(entries) | Data::Table { entries, .. }) => {
                !entries.is_empty()
            }
            (Category::Sequence, _) => true,
            (Category::InstanceOwned | Category::InstanceLibrary, _) => {
                object.attrs.as_ref().is_some_and(|attrs| !attrs.is_empty())
            }
            _ => false,
        }
    }
}

/// A 2-D matrix in which every row equals row 0. Indexing such a matrix
/// yields the matrix again, so enumerating it would never bottom out.
pub fn is_degenerate_matrix(cells: &[Vec<f64>]) -> bool {
    match cells.first() {
        Some(first) => cells.iter().all(|row| row == first),
        None => false,
    }
}

/// Length of a sized, integer-indexable shape. `Ok(None)` means the shape
/// does not support the protocol at all.
fn sequence_len(data: &Data) -> Result<Option<usize>, ShapeError> {
    let len = match data {
        Data::List(items) | Data::Tuple(items) | Data::Array { items, .. } => items.len(),
        Data::Bytes(bytes) => bytes.len(),
        Data::Matrix { rows, .. } => rows.len(),
        Data::Custom(shape) => {
            let len = shape.len()?;
            for index in 0..len {
                shape.get(index)?;
            }
            len
        }
        Data::Plain | Data::Dict(_) | Data::Table { .. } => return Ok(None),
    };
    Ok(Some(len))
}

/// Enumerate a sized, integer-indexable shape.
fn sequence_items(data: &Data) -> Result<Option<Vec<(Key, Value)>>, ShapeError> {
    let children = match data {
        Data::List(items) | Data::Tuple(items) | Data::Array { items, .. } => indexed(items.iter().cloned()),
        Data::Bytes(bytes) => indexed(bytes.iter().map(|b| Value::Int(i64::from(*b)))),
        Data::Matrix { rows, .. } => indexed(rows.iter().map(|id| Value::Ref(*id))),
        Data::Custom(shape) => {
            let len = shape.len()?;
            (0..len)
                .map(|index| shape.get(index).map(|value| (Key::from(index), value)))
                .collect::<Result<Vec<_>, _>>()?
        }
        Data::Plain | Data::Dict(_) | Data::Table { .. } => return Ok(None),
    };
    Ok(Some(children))
}

fn indexed(values: impl Iterator<Item = Value>) -> Vec<(Key, Value)> {
    values
        .enumerate()
        .map(|(index, value)| (Key::from(index), value))
        .collect()
}
