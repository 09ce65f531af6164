//! Artifact names and subnames.
//!
//! Every traceable artifact is identified by a typed, hierarchical name such
//! as `REQ-purpose` or `SPC-scan-text`. A [`Name`] can only be obtained by
//! validating a string against the grammar, so a `Name` value is always
//! well-formed. A [`SubName`] identifies a named fragment *within* an
//! artifact's text, written as a dotted suffix such as `.shape` or
//! `.tst-edge_case`.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The category of an artifact, determined by the prefix of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A requirement (`REQ-`): why the system exists.
    Requirement,
    /// A specification (`SPC-`): how a requirement is met.
    Specification,
    /// A test (`TST-`): how a specification is verified.
    Test,
}

impl Kind {
    /// The canonical (uppercase) name prefix for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requirement => "REQ",
            Self::Specification => "SPC",
            Self::Test => "TST",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        if prefix.eq_ignore_ascii_case("REQ") {
            Some(Self::Requirement)
        } else if prefix.eq_ignore_ascii_case("SPC") {
            Some(Self::Specification)
        } else if prefix.eq_ignore_ascii_case("TST") {
            Some(Self::Test)
        } else {
            None
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned when validating names and subnames.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The string does not match the name grammar
    /// `(REQ|SPC|TST)-SEGMENT(-SEGMENT)*`.
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// The string does not match the subname grammar
    /// `.(tst-)?SEGMENT`.
    #[error("Invalid subname: {0}")]
    InvalidSubName(String),
}

/// True for the characters permitted in a name segment: `[A-Za-z0-9_]`.
const fn is_segment_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// A validated artifact name.
///
/// Grammar (case-insensitive, anchored at both ends):
///
/// ```text
/// (REQ|SPC|TST)-SEGMENT(-SEGMENT)*      SEGMENT = [A-Z0-9_]+
/// ```
///
/// The text as written is preserved for display and round-tripping, while
/// equality, hashing and ordering all use the upper-cased key, so case never
/// matters for comparison.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
///
/// use reqtrace::{Kind, Name};
///
/// let name = Name::from_str("REQ-Example")?;
/// assert_eq!(name.kind(), Kind::Requirement);
/// assert_eq!(name.as_str(), "REQ-Example");
/// assert_eq!(name.key_str(), "REQ-EXAMPLE");
///
/// // case is ignored for equality
/// assert_eq!(Name::from_str("SPC-key")?, Name::from_str("sPc-KeY")?);
/// # Ok::<(), reqtrace::NameError>(())
/// ```
#[derive(Clone)]
pub struct Name {
    kind: Kind,
    /// Upper-cased form, used for all comparisons.
    key: String,
    /// The text exactly as written.
    raw: String,
}

impl Name {
    /// The name exactly as the user wrote it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The canonical (upper-cased) key, used for equality and ordering.
    #[must_use]
    pub fn key_str(&self) -> &str {
        &self.key
    }

    /// The artifact category encoded in the name's prefix.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Concatenates the name with an optional subname.
    ///
    /// ```
    /// use std::str::FromStr;
    ///
    /// use reqtrace::{Name, SubName};
    ///
    /// let name = Name::from_str("REQ-foo")?;
    /// let sub = SubName::from_str(".sub")?;
    /// assert_eq!(name.full(Some(&sub)), "REQ-foo.sub");
    /// assert_eq!(name.full(None), "REQ-foo");
    /// # Ok::<(), reqtrace::NameError>(())
    /// ```
    #[must_use]
    pub fn full(&self, sub: Option<&SubName>) -> String {
        let mut out = self.raw.clone();
        if let Some(sub) = sub {
            out.push_str(sub.as_str());
        }
        out
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidName(raw.to_string());
        let (prefix, rest) = raw.split_at_checked(3).ok_or_else(invalid)?;
        let kind = Kind::from_prefix(prefix).ok_or_else(invalid)?;
        let segments = rest.strip_prefix('-').ok_or_else(invalid)?;
        if segments
            .split('-')
            .any(|segment| segment.is_empty() || !segment.bytes().all(is_segment_char))
        {
            return Err(invalid());
        }
        Ok(Self {
            kind,
            key: raw.to_ascii_uppercase(),
            raw: raw.to_string(),
        })
    }
}

impl TryFrom<&str> for Name {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A validated subname, naming a fragment within an artifact's text.
///
/// Grammar (case-insensitive, anchored at both ends): a leading `.`, an
/// optional literal `tst-` marker, then one or more of `[A-Z0-9_]`. The
/// marker tags the fragment as a test-level case rather than an ordinary
/// document section; it is preserved verbatim and carries no further
/// validation here — interpreting it is the resolver's concern.
///
/// As with [`Name`], the written form is preserved and all comparisons use
/// the upper-cased key.
#[derive(Clone)]
pub struct SubName {
    /// Upper-cased form, used for all comparisons.
    key: String,
    /// The text exactly as written, including the leading `.`.
    raw: String,
}

impl SubName {
    /// The subname exactly as written, including the leading `.`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The canonical (upper-cased) key, used for equality and ordering.
    #[must_use]
    pub fn key_str(&self) -> &str {
        &self.key
    }

    /// Whether this subname carries the `tst-` marker, i.e. refers to a
    /// test-level fragment.
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.key.starts_with(".TST-")
    }
}

impl FromStr for SubName {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidSubName(raw.to_string());
        let body = raw.strip_prefix('.').ok_or_else(invalid)?;
        let tail = match body.get(..4) {
            Some(marker) if marker.eq_ignore_ascii_case("tst-") => &body[4..],
            _ => body,
        };
        if tail.is_empty() || !tail.bytes().all(is_segment_char) {
            return Err(invalid());
        }
        Ok(Self {
            key: raw.to_ascii_uppercase(),
            raw: raw.to_string(),
        })
    }
}

impl TryFrom<&str> for SubName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl fmt::Display for SubName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl fmt::Debug for SubName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.raw)
    }
}

impl PartialEq for SubName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for SubName {}

impl Hash for SubName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Ord for SubName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for SubName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for SubName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for SubName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
