use std::fmt;

use serde::{Serialize, Serializer};

/// One segment of a property path: a member name plus an optional collection
/// index when the member was reached through a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub name: String,
    pub index: Option<usize>,
}

impl PathSegment {
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(idx) => write!(f, "{}[{}]", self.name, idx),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Ordered sequence of segments identifying one property inside a compared
/// object graph.
///
/// The canonical rendering is dot-separated with `[i]` index suffixes, e.g.
/// `items[2].price`. Exact ignore rules match byte-for-byte against this
/// rendering, so [`fmt::Display`] is the single source of truth for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath(Vec<PathSegment>);

impl PropertyPath {
    /// The empty path (root of the compared graph).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Parse the canonical rendering back into segments.
    ///
    /// Never fails: a token whose bracket suffix does not parse as a number
    /// is kept verbatim as a member name.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        let mut segments = Vec::new();
        for token in path.split('.') {
            match parse_token(token) {
                Some(parsed) => segments.extend(parsed),
                None => segments.push(PathSegment::field(token)),
            }
        }
        Self(segments)
    }

    /// Child path with a named member appended.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::field(name));
        Self(segments)
    }

    /// Child path with an indexed entry appended to the last segment's name.
    pub fn child_index(&self, name: &str, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::indexed(name, index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Name of the last segment — the property name smart rules match on.
    pub fn last_name(&self) -> Option<&str> {
        self.0.last().map(|s| s.name.as_str())
    }

    /// Canonical string form (same as `to_string`, named for call sites that
    /// read better with a verb).
    pub fn render(&self) -> String {
        self.to_string()
    }
}

/// `name[i][j]...` into the named segment carrying the first index, then one
/// index-only segment per further bracket (nested sequences). `None` when any
/// bracket is malformed.
fn parse_token(token: &str) -> Option<Vec<PathSegment>> {
    let open = token.find('[')?;
    let (name, mut rest) = token.split_at(open);
    let mut segments = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        let idx: usize = inner[..close].parse().ok()?;
        if segments.is_empty() {
            segments.push(PathSegment::indexed(name, idx));
        } else {
            segments.push(PathSegment::indexed("", idx));
        }
        rest = &inner[close + 1..];
    }
    Some(segments)
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            // Index-only segments (nested sequence levels) join without a
            // separator: `m[1][0]`, not `m[1].[0]`.
            if i > 0 && !segment.name.is_empty() {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for PropertyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_dotted_path_with_indices() {
        let path = PropertyPath::from_segments(vec![
            PathSegment::field("order"),
            PathSegment::indexed("items", 2),
            PathSegment::field("price"),
        ]);
        assert_eq!(path.to_string(), "order.items[2].price");
    }

    #[test]
    fn parse_round_trips_canonical_form() {
        for raw in ["order.items[2].price", "id", "a[0].b[1].c", "m[1][0]", "[2]", ""] {
            assert_eq!(PropertyPath::parse(raw).render(), raw);
        }
    }

    #[test]
    fn index_only_segment_renders_without_separator() {
        let path = PropertyPath::from_segments(vec![
            PathSegment::indexed("m", 1),
            PathSegment::indexed("", 0),
        ]);
        assert_eq!(path.render(), "m[1][0]");
        assert_eq!(PropertyPath::parse("m[1][0]"), path);
    }

    #[test]
    fn parse_keeps_malformed_brackets_as_names() {
        let path = PropertyPath::parse("items[x]");
        assert_eq!(path.segments().len(), 1);
        assert_eq!(path.last_name(), Some("items[x]"));
    }

    #[test]
    fn last_name_ignores_index() {
        let path = PropertyPath::parse("order.items[2]");
        assert_eq!(path.last_name(), Some("items"));
    }

    #[test]
    fn root_is_empty() {
        assert!(PropertyPath::root().is_root());
        assert_eq!(PropertyPath::root().last_name(), None);
    }
}
