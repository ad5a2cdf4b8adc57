//! Value categories

use std::fmt;

use serde::Serialize;

/// How a value's children are enumerated and how child paths are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Mapping,
    Sequence,
    /// No enumerable children.
    ScalarLike,
    /// Attribute bag whose class lives in the entry module.
    InstanceOwned,
    /// Attribute bag whose class lives in library code.
    InstanceLibrary,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Mapping,
        Category::Sequence,
        Category::ScalarLike,
        Category::InstanceOwned,
        Category::InstanceLibrary,
    ];

    pub fn is_instance(self) -> bool {
        matches!(self, Category::InstanceOwned | Category::InstanceLibrary)
    }

    pub fn is_scalar(self) -> bool {
        self == Category::ScalarLike
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Mapping => "mapping",
            Category::Sequence => "sequence",
            Category::ScalarLike => "scalar_like",
            Category::InstanceOwned => "instance_owned",
            Category::InstanceLibrary => "instance_library",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
