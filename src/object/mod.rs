//! Object graph model
//!
//! The explorer reads a graph of heap objects held in a [`Heap`] arena.
//! A [`Namespace`] pairs that heap with the object standing in for the
//! process's top-level namespace ("globals").

mod heap;
mod key;
mod repr;

pub use heap::{
    BUILTINS, Class, Data, Heap, ObjId, Object, SequenceProtocol, TableKind, Value, array_object,
    panel_object, series_object,
};
pub use key::{Key, quote};
pub use repr::{ELLIPSIS, ReprLimits, repr, repr_float, repr_with};

/// A heap plus the module object whose attributes are the top-level names.
#[derive(Debug)]
pub struct Namespace {
    heap: Heap,
    globals: ObjId,
}

impl Namespace {
    pub fn new() -> Self {
        let mut heap = Heap::new();
        let globals = heap.instance(Class::builtin("module"));
        Self { heap, globals }
    }

    /// Wrap an existing heap whose `globals` object holds the top-level names.
    pub fn from_parts(heap: Heap, globals: ObjId) -> Self {
        Self { heap, globals }
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn globals(&self) -> ObjId {
        self.globals
    }

    /// Bind a top-level name.
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.heap.set_attr(self.globals, name, value);
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.heap.get(self.globals).attr(name)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}
