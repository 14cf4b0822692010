//! Per-tag inlining of referenced stylesheet and script contents.

use std::path::Path;

use crate::assets::AssetMap;
use crate::scan::{TagScanner, render_attributes};

use super::{SCRIPT_PROFILE, STYLESHEET_PROFILE, TagProfile};

/// Replace every qualifying `<link rel="stylesheet">` with an inline
/// `<style>` tag carrying the loaded content.
pub fn inline_stylesheets(html: &str, base: &Path, assets: &AssetMap) -> String {
    inline_tags(html, base, assets, &STYLESHEET_PROFILE)
}

/// Replace every qualifying `<script src>` with an inline `<script>` tag
/// carrying the loaded content.
pub fn inline_scripts(html: &str, base: &Path, assets: &AssetMap) -> String {
    inline_tags(html, base, assets, &SCRIPT_PROFILE)
}

/// Rewrite each qualifying tag independently, in place.
///
/// The replacement keeps the original attributes in order minus the profile's
/// dropped ones. A tag whose resolved path never made it into the asset map
/// is emitted byte-for-byte unchanged, original quoting included.
fn inline_tags(html: &str, base: &Path, assets: &AssetMap, profile: &TagProfile) -> String {
    let scanner = TagScanner::new(profile.scan_tag, profile.two_form);
    scanner.replace_all(html, |tag| {
        let (attrs, path) = profile.candidate_path(tag, base)?;
        let content = assets.content(&path)?;
        Some(format!(
            "<{tag}{attrs}>{content}</{tag}>",
            tag = profile.output_tag,
            attrs = render_attributes(&attrs, profile.dropped_attrs),
        ))
    })
}
