//! Access path synthesis

use crate::object::Key;

use super::category::Category;

/// Path of a child reached through `key` from a parent at `parent_path`.
///
/// Attribute children use `.name`, text keys `['key']`, anything else
/// `[key]`. Quotes inside text keys are not escaped.
pub fn build_path(key: &Key, parent_category: Category, parent_path: &str) -> String {
    if parent_path.is_empty() {
        key.to_string()
    } else if parent_category.is_instance() {
        format!("{}.{}", parent_path, key)
    } else if let Key::Str(text) = key {
        format!("{}['{}']", parent_path, text)
    } else {
        format!("{}[{}]", parent_path, key)
    }
}
