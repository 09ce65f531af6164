//! Scanning free text for bracketed artifact references.
//!
//! Documentation and code comments link artifacts together by embedding
//! `[[...]]` references. Three shapes are recognised:
//!
//! - `[[REQ-foo]]` — a reference to another artifact.
//! - `[[REQ-foo.bar]]` — a reference to the `.bar` fragment of another
//!   artifact.
//! - `[[.bar]]` — a bare fragment, referring to the artifact whose text is
//!   being scanned.
//!
//! Anything between `[[` and `]]` that fits none of these shapes is not a
//! reference. It is skipped without an error, since prose may contain double
//! brackets for entirely unrelated reasons.

use std::{collections::BTreeSet, ops::Range, str::FromStr};

use crate::name::{Name, SubName};

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// One reference found in a block of text.
///
/// At least one of [`target`](Self::target) and [`sub`](Self::sub) is always
/// present: a reference with neither cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    target: Option<Name>,
    sub: Option<SubName>,
    span: Range<usize>,
}

impl Reference {
    /// Attempts to parse the interior of a `[[...]]` span.
    ///
    /// The whole body must be consumed by one of the three accepted shapes;
    /// anything else is not a reference.
    fn parse(body: &str, span: Range<usize>) -> Option<Self> {
        if body.starts_with('.') {
            let sub = SubName::from_str(body).ok()?;
            return Some(Self {
                target: None,
                sub: Some(sub),
                span,
            });
        }
        match body.find('.') {
            Some(dot) => {
                let target = Name::from_str(&body[..dot]).ok()?;
                let sub = SubName::from_str(&body[dot..]).ok()?;
                Some(Self {
                    target: Some(target),
                    sub: Some(sub),
                    span,
                })
            }
            None => {
                let target = Name::from_str(body).ok()?;
                Some(Self {
                    target: Some(target),
                    sub: None,
                    span,
                })
            }
        }
    }

    /// The referenced artifact, or `None` for a bare fragment reference to
    /// the artifact currently being scanned.
    #[must_use]
    pub const fn target(&self) -> Option<&Name> {
        self.target.as_ref()
    }

    /// The referenced fragment, if any.
    #[must_use]
    pub const fn sub(&self) -> Option<&SubName> {
        self.sub.as_ref()
    }

    /// Byte offsets of the entire `[[...]]` construct in the scanned text.
    ///
    /// Slicing the scanned text with this range returns the bracketed match,
    /// which callers can use to report positions or rewrite in place.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.span.start..self.span.end
    }

    /// The reference text as written, without the brackets.
    #[must_use]
    pub fn full(&self) -> String {
        let mut out = String::new();
        if let Some(target) = &self.target {
            out.push_str(target.as_str());
        }
        if let Some(sub) = &self.sub {
            out.push_str(sub.as_str());
        }
        out
    }
}

/// Scans `text` for artifact references, in document order.
///
/// The returned iterator is lazy and restartable: calling `references` again
/// on the same text yields an identical sequence, and no state is shared
/// between scans. Malformed bracket spans are skipped silently.
///
/// # Examples
///
/// ```
/// let found: Vec<_> = reqtrace::references("see [[REQ-a]] and [[SPC-b.tst-c]]").collect();
///
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].target().unwrap().key_str(), "REQ-A");
/// assert_eq!(found[1].sub().unwrap().as_str(), ".tst-c");
/// ```
#[must_use]
pub const fn references(text: &str) -> References<'_> {
    References { text, pos: 0 }
}

/// Iterator over the references in a block of text. See [`references`].
#[derive(Debug, Clone)]
pub struct References<'a> {
    text: &'a str,
    pos: usize,
}

impl Iterator for References<'_> {
    type Item = Reference;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // An unterminated `[[` ends the scan.
            let open = self.pos + self.text[self.pos..].find(OPEN)?;
            let body_start = open + OPEN.len();
            let close = body_start + self.text[body_start..].find(CLOSE)?;
            let end = close + CLOSE.len();
            // A rejected span is never re-entered, so the scan stays linear.
            self.pos = end;
            if let Some(reference) = Reference::parse(&self.text[body_start..close], open..end) {
                return Some(reference);
            }
            tracing::trace!(
                span = ?(open..end),
                "skipping malformed bracket span"
            );
        }
    }
}

impl std::iter::FusedIterator for References<'_> {}

/// Collects the subnames declared in `text` via bare fragment references
/// such as `[[.shape]]`, deduplicated case-insensitively.
///
/// Fragments attached to a named target (`[[SPC-b.shape]]`) refer to *other*
/// artifacts and are not included.
#[must_use]
pub fn subnames(text: &str) -> BTreeSet<SubName> {
    references(text)
        .filter(|reference| reference.target.is_none())
        .filter_map(|reference| reference.sub)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<Reference> {
        references(text).collect()
    }

    #[test]
    fn yields_matches_in_document_order() {
        let found = scan("see [[REQ-A]] and [[SPC-B]]");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].target().unwrap().key_str(), "REQ-A");
        assert_eq!(found[1].target().unwrap().key_str(), "SPC-B");
        assert!(found[0].sub().is_none());
        assert!(found[1].sub().is_none());
    }

    #[test]
    fn name_with_fragment() {
        let found = scan("[[SPC-B.sub1]]");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target().unwrap().key_str(), "SPC-B");
        assert_eq!(found[0].sub().unwrap().as_str(), ".sub1");
        assert_eq!(found[0].span(), 0..14);
    }

    #[test]
    fn bare_fragment() {
        let found = scan("[[.sub1]]");
        assert_eq!(found.len(), 1);
        assert!(found[0].target().is_none());
        assert_eq!(found[0].sub().unwrap().as_str(), ".sub1");
    }

    #[test]
    fn test_marker_fragment() {
        let found = scan("[[SPC-B.tst-case1]]");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sub().unwrap().as_str(), ".tst-case1");
        assert!(found[0].sub().unwrap().is_test());
    }

    #[test]
    fn malformed_spans_are_silently_skipped() {
        let text = "a [[not a ref]] b [[REQ-A]] c";
        let found = scan(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target().unwrap().key_str(), "REQ-A");
        assert_eq!(&text[found[0].span()], "[[REQ-A]]");
    }

    #[test]
    fn rejected_span_is_not_reentered() {
        // The opening `[[` starts a span running to the first `]]`; its body
        // is malformed, so the whole span (including the inner `[[REQ-B`)
        // is consumed without a match.
        assert!(scan("[[REQ-A-[[REQ-B]]").is_empty());
    }

    #[test]
    fn unterminated_open_ends_the_scan() {
        assert!(scan("tail [[REQ-A").is_empty());
        assert!(scan("[[").is_empty());
    }

    #[test]
    fn degenerate_bodies_do_not_match() {
        assert!(scan("[[]]").is_empty());
        assert!(scan("[[ REQ-A ]]").is_empty());
        assert!(scan("[[REQ-A.b.c]]").is_empty());
        assert!(scan("no references here").is_empty());
        assert!(scan("").is_empty());
    }

    #[test]
    fn adjacent_references_both_match() {
        let text = "[[REQ-A]][[REQ-B]]";
        let found = scan(text);
        assert_eq!(found.len(), 2);
        assert_eq!(&text[found[0].span()], "[[REQ-A]]");
        assert_eq!(&text[found[1].span()], "[[REQ-B]]");
    }

    #[test]
    fn matching_is_case_insensitive_but_preserves_raw_text() {
        let found = scan("[[req-a.SUB]]");
        assert_eq!(found.len(), 1);
        let target = found[0].target().unwrap();
        assert_eq!(target.as_str(), "req-a");
        assert_eq!(target.key_str(), "REQ-A");
        assert_eq!(found[0].sub().unwrap().as_str(), ".SUB");
        assert_eq!(found[0].full(), "req-a.SUB");
    }

    #[test]
    fn scans_are_restartable_and_deterministic() {
        let text = "x [[REQ-A]] y [[bad]] z [[.frag]]";
        assert_eq!(scan(text), scan(text));
    }

    #[test]
    fn iteration_is_lazy() {
        let mut iter = references("[[REQ-A]] [[REQ-B]]");
        let first = iter.next().unwrap();
        assert_eq!(first.target().unwrap().key_str(), "REQ-A");
        assert_eq!(first.span(), 0..9);
    }

    #[test]
    fn subnames_collects_bare_fragments_only() {
        let collected = subnames("[[.a]] [[.B]] [[SPC-x.c]] [[.a]] [[.A]]");
        let raw: Vec<_> = collected.iter().map(SubName::as_str).collect();
        // deduplicated case-insensitively; first-seen raw form wins
        assert_eq!(raw, [".a", ".B"]);
    }
}
