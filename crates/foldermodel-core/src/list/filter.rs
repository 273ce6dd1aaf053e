//! Type-prefix filtering.

/// Accepted type-tag prefixes.
///
/// A tag passes when it starts with any prefix. An empty set passes
/// nothing: a model with no filters shows an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilterSet {
    prefixes: Vec<String>,
}

impl TypeFilterSet {
    /// Creates a filter set from `prefixes`, dropping duplicates.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for prefix in prefixes {
            let prefix = prefix.into();
            if !deduped.contains(&prefix) {
                deduped.push(prefix);
            }
        }
        Self { prefixes: deduped }
    }

    /// Returns `true` if `file_type` starts with any accepted prefix.
    pub fn matches(&self, file_type: &str) -> bool {
        self.prefixes.iter().any(|p| file_type.starts_with(p.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
