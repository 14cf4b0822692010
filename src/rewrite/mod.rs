//! Document rewriting passes that replace reference tags with inline ones.
//!
//! Both passes share a [`TagProfile`] describing how one asset kind appears
//! in markup: which tag to scan, which attribute locates the file, which
//! attributes are dropped on conversion and which tag carries the inlined
//! content. Qualification is identical for both passes; only the replacement
//! strategy differs.

mod combine;
mod inline;

pub use combine::{combine_scripts, combine_stylesheets};
pub use inline::{inline_scripts, inline_stylesheets};

use std::path::{Path, PathBuf};

use crate::assets::resolve_reference;
use crate::scan::{Attribute, TagMatch, attribute_value, is_stylesheet_link, parse_attributes};

/// How one asset kind is referenced and inlined in markup.
pub struct TagProfile {
    /// Tag name scanned for references.
    pub scan_tag: &'static str,
    /// Whether the scanned tag appears in both self-closing and container form.
    pub two_form: bool,
    /// Attribute whose value locates the referenced file.
    pub locator: &'static str,
    /// Attributes dropped when the tag is converted to its inline form.
    pub dropped_attrs: &'static [&'static str],
    /// Tag name used for the inline replacement.
    pub output_tag: &'static str,
    /// Whether only `rel="stylesheet"` tags qualify.
    pub requires_stylesheet_rel: bool,
}

/// `<link rel="stylesheet" href>` converted to `<style>`.
pub const STYLESHEET_PROFILE: TagProfile = TagProfile {
    scan_tag: "link",
    two_form: false,
    locator: "href",
    dropped_attrs: &["href", "rel", "type"],
    output_tag: "style",
    requires_stylesheet_rel: true,
};

/// `<script src>` converted to an inline `<script>`.
pub const SCRIPT_PROFILE: TagProfile = TagProfile {
    scan_tag: "script",
    two_form: true,
    locator: "src",
    dropped_attrs: &["src"],
    output_tag: "script",
    requires_stylesheet_rel: false,
};

impl TagProfile {
    /// Parse a matched tag and resolve its referenced path, when the tag is a
    /// bundling candidate for this profile.
    ///
    /// Non-candidates (wrong `rel`, missing or empty locator, remote URL) are
    /// reported as `None` so callers pass them through untouched.
    pub fn candidate_path(&self, tag: &TagMatch<'_>, base: &Path) -> Option<(Vec<Attribute>, PathBuf)> {
        let attrs = parse_attributes(tag.attrs_raw);
        if self.requires_stylesheet_rel && !is_stylesheet_link(&attrs) {
            return None;
        }

        let reference = attribute_value(&attrs, self.locator)?;
        let path = resolve_reference(base, reference)?;
        Some((attrs, path))
    }
}
