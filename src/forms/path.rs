//! Typed field addresses for nested form records.
//!
//! A [`FieldPath`] is a sequence of record keys and array indices. It renders
//! to the dotted form (`travelerDetails.1.name`) used for error keys and CLI
//! input, and parses back from it: purely numeric segments are indices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Address of a single slot inside a form record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path, addressing the whole record
    pub fn root() -> Self {
        Self::default()
    }

    /// Path consisting of a single key
    pub fn key(name: impl Into<String>) -> Self {
        Self { segments: vec![Segment::Key(name.into())] }
    }

    /// Extend with a record key
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(name.into()));
        self
    }

    /// Extend with an array index
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last key segment, used as the default label in messages
    pub fn leaf_name(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|segment| match segment {
            Segment::Key(key) => Some(key.as_str()),
            Segment::Index(_) => None,
        })
    }

    /// Path with the last segment removed
    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// True when `self` equals `other` or addresses a slot beneath it
    pub fn starts_with(&self, other: &FieldPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Error returned when a dotted path string is malformed
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("invalid field path: '{0}'")]
pub struct FieldPathParseError(pub String);

impl FromStr for FieldPath {
    type Err = FieldPathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments = s
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    return Err(FieldPathParseError(s.to_string()));
                }
                if part.bytes().all(|b| b.is_ascii_digit()) {
                    part.parse().map(Segment::Index).map_err(|_| FieldPathParseError(s.to_string()))
                } else {
                    Ok(Segment::Key(part.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Build a [`FieldPath`] from a dotted literal known to be well formed.
#[macro_export]
macro_rules! field_path {
    ($($segment:expr),+ $(,)?) => {{
        let mut path = $crate::forms::FieldPath::root();
        $( path = $crate::forms::path::PathSegment::push_onto($segment, path); )+
        path
    }};
}

/// Conversion used by [`field_path!`] to accept keys and indices alike
pub trait PathSegment {
    fn push_onto(self, path: FieldPath) -> FieldPath;
}

impl PathSegment for &str {
    fn push_onto(self, path: FieldPath) -> FieldPath {
        path.field(self)
    }
}

impl PathSegment for String {
    fn push_onto(self, path: FieldPath) -> FieldPath {
        path.field(self)
    }
}

impl PathSegment for usize {
    fn push_onto(self, path: FieldPath) -> FieldPath {
        path.index(self)
    }
}
