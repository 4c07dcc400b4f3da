//! Request normalization for single-or-many name arguments
//!
//! Registration and loading both accept either one name or an ordered
//! sequence of names. `Names` captures that shape at the API boundary so
//! the engine only ever sees an ordered `Vec<String>` with empty strings
//! already dropped.

/// A single name or an ordered sequence of names.
///
/// Conversions exist from the obvious string and sequence types, so call
/// sites can pass `"config"`, `vec!["a", "b"]`, or `["a", "b"]` directly.
#[derive(Debug, Clone)]
pub enum Names {
    /// A single name
    One(String),
    /// An ordered sequence of names
    Many(Vec<String>),
}

impl Names {
    /// Normalize to an ordered list, dropping empty name strings.
    ///
    /// Empty names are silently ignored; the returned list may be empty.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Names::One(name) => {
                if name.is_empty() {
                    Vec::new()
                } else {
                    vec![name]
                }
            }
            Names::Many(names) => names.into_iter().filter(|n| !n.is_empty()).collect(),
        }
    }
}

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Names::One(name.to_string())
    }
}

impl From<String> for Names {
    fn from(name: String) -> Self {
        Names::One(name)
    }
}

impl From<Vec<String>> for Names {
    fn from(names: Vec<String>) -> Self {
        Names::Many(names)
    }
}

impl From<Vec<&str>> for Names {
    fn from(names: Vec<&str>) -> Self {
        Names::Many(names.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Names {
    fn from(names: &[&str]) -> Self {
        Names::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(names: [&str; N]) -> Self {
        Names::Many(names.iter().map(|n| n.to_string()).collect())
    }
}
