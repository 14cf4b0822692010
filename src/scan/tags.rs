//! Regex-driven scanner locating `<script>`, `<link>` and `<style>` tags.

use regex::{Captures, Regex};

use super::attrs::{Attribute, attribute_value};

/// One located tag occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch<'h> {
    /// Full matched span, exactly as it appears in the document.
    pub full: &'h str,
    /// Raw attribute substring between the tag name and the closing bracket.
    pub attrs_raw: &'h str,
    /// Inner content for container-form matches, `None` for self-closing ones.
    pub inner: Option<&'h str>,
}

impl<'h> TagMatch<'h> {
    fn from_captures(caps: &Captures<'h>) -> Self {
        let full = caps.get(0).map_or("", |span| span.as_str());
        match caps.get(1) {
            Some(attrs) => Self {
                full,
                attrs_raw: attrs.as_str(),
                inner: None,
            },
            None => Self {
                full,
                attrs_raw: caps.get(2).map_or("", |attrs| attrs.as_str()),
                inner: Some(caps.get(3).map_or("", |inner| inner.as_str())),
            },
        }
    }
}

/// Scanner for all non-overlapping occurrences of one tag name.
///
/// Scanners are stateless between calls and never share matching position,
/// so documents can be processed concurrently with one scanner each.
pub struct TagScanner {
    pattern: Regex,
}

impl TagScanner {
    /// Compile a scanner for `tag`.
    ///
    /// With `two_form` disabled only the void/self-closing form
    /// `<tag ...>`/`<tag .../>` is recognized (used for `<link>`). With it
    /// enabled the alternation tries the self-closing form first, then the
    /// container form `<tag ...>inner</tag>`, per occurrence (used for
    /// `<script>` and `<style>`). Matching is case-insensitive and container
    /// content may span newlines.
    pub fn new(tag: &str, two_form: bool) -> Self {
        let name = regex::escape(tag);
        let source = if two_form {
            format!(r"(?is)<{name}\b([^>]*?)/>|<{name}\b([^>]*)>(.*?)</{name}\s*>")
        } else {
            format!(r"(?is)<{name}\b([^>]*?)/?>")
        };
        let pattern = Regex::new(&source).expect("invalid tag scanner regex");
        Self { pattern }
    }

    /// Iterate every occurrence in document order.
    pub fn matches<'r, 'h>(&'r self, html: &'h str) -> impl Iterator<Item = TagMatch<'h>> + 'r
    where
        'h: 'r,
    {
        self.pattern
            .captures_iter(html)
            .map(|caps| TagMatch::from_captures(&caps))
    }

    /// First occurrence only, if any.
    pub fn find_first<'h>(&self, html: &'h str) -> Option<TagMatch<'h>> {
        self.pattern
            .captures(html)
            .map(|caps| TagMatch::from_captures(&caps))
    }

    /// Rewrite every occurrence through `rewrite`.
    ///
    /// Returning `None` keeps the original tag text byte-for-byte; the
    /// replacement text is never rescanned within the same pass.
    pub fn replace_all<F>(&self, html: &str, mut rewrite: F) -> String
    where
        F: FnMut(&TagMatch<'_>) -> Option<String>,
    {
        self.pattern
            .replace_all(html, |caps: &Captures<'_>| {
                let tag = TagMatch::from_captures(caps);
                rewrite(&tag).unwrap_or_else(|| tag.full.to_string())
            })
            .into_owned()
    }
}

/// Whether a `<link>` attribute list marks a stylesheet reference.
///
/// Only `rel="stylesheet"` (case-insensitive exact match) qualifies; every
/// other link tag is never a candidate for extraction or replacement.
pub fn is_stylesheet_link(attrs: &[Attribute]) -> bool {
    attribute_value(attrs, "rel").is_some_and(|rel| rel.eq_ignore_ascii_case("stylesheet"))
}
