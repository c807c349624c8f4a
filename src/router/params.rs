use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maximum number of path parameters before heap allocation.
/// Sibling patterns under one prefix rarely carry more than a handful of groups.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the dispatch path.
///
/// Names are `Arc<str>` shared with the compiled pattern, so building a map
/// per request only copies the matched values.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Named path parameters extracted from one request path.
///
/// Keys are the capture-group names of the pattern that matched and are
/// unique (the regex compiler rejects duplicate group names). A fresh value
/// is built for every dispatched request and dropped when the handler returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: ParamVec,
}

impl PathParams {
    /// Create an empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_vec(params: ParamVec) -> Self {
        Self { params }
    }

    /// Get a parameter value by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a parameter with this name was extracted
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate `(name, value)` pairs in capture-group order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Parameter names in capture-group order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(k, _)| k.as_ref())
    }

    /// Convert to a HashMap
    /// Note: This allocates - use get() in handlers instead
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// `name=value` pairs in capture-group order, separated by `&`
impl fmt::Display for PathParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}
