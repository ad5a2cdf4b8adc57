//! Mapping keys and their textual forms

use std::fmt;

use serde::Serialize;

/// Identifier used to reach a child from its parent: an attribute name,
/// a sequence index, a mapping key or a composite (tuple) key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    Tuple(Vec<Key>),
}

impl Key {
    pub fn is_text(&self) -> bool {
        matches!(self, Key::Str(_))
    }

    /// Quoted form used inside composite keys and mapping reprs.
    pub fn repr(&self) -> String {
        match self {
            Key::Str(s) => quote(s),
            other => other.to_string(),
        }
    }
}

/// Single-quoted string literal with backslash escapes.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::None => write!(f, "None"),
            Key::Bool(true) => write!(f, "True"),
            Key::Bool(false) => write!(f, "False"),
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => write!(f, "{}", s),
            Key::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(Key::repr).collect();
                if inner.len() == 1 {
                    write!(f, "({},)", inner[0])
                } else {
                    write!(f, "({})", inner.join(", "))
                }
            }
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Int(i as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_str_conversion() {
        assert_eq!(Key::from("name").to_string(), "name");
        assert_eq!(Key::Int(-3).to_string(), "-3");
        assert_eq!(Key::Bool(true).to_string(), "True");
        assert_eq!(Key::None.to_string(), "None");
    }

    #[test]
    fn test_tuple_display() {
        let pair = Key::Tuple(vec![Key::Int(4), Key::Int(5)]);
        assert_eq!(pair.to_string(), "(4, 5)");

        let mixed = Key::Tuple(vec![Key::from("a"), Key::Int(1)]);
        assert_eq!(mixed.to_string(), "('a', 1)");

        let single = Key::Tuple(vec![Key::Int(4)]);
        assert_eq!(single.to_string(), "(4,)");

        assert_eq!(Key::Tuple(Vec::new()).to_string(), "()");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\nb"), "'a\\nb'");
    }
}
