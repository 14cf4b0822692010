//! Two-phase merging of all qualifying reference tags into a single tag.

use std::path::Path;

use crate::assets::AssetMap;
use crate::scan::{Attribute, TagScanner, render_attributes};

use super::{SCRIPT_PROFILE, STYLESHEET_PROFILE, TagProfile};

/// Merge every qualifying stylesheet link into one `<style>` tag at the
/// position of the first, deleting the rest.
pub fn combine_stylesheets(html: &str, base: &Path, assets: &AssetMap) -> String {
    combine_tags(html, base, assets, &STYLESHEET_PROFILE)
}

/// Merge every qualifying sourced script into one `<script>` tag at the
/// position of the first, deleting the rest.
pub fn combine_scripts(html: &str, base: &Path, assets: &AssetMap) -> String {
    combine_tags(html, base, assets, &SCRIPT_PROFILE)
}

/// Placeholder dropped at the first qualifying tag during pass one.
///
/// Control characters cannot occur in well-formed HTML text, so the token
/// can never collide with document content or with the combined asset
/// contents inserted later.
fn placeholder_for(profile: &TagProfile) -> String {
    format!("\u{1}combined-{}\u{1}", profile.output_tag)
}

/// Collect-and-delete in pass one, insert the finished tag in pass two.
///
/// The combined contents may themselves contain text that looks like fresh
/// tag occurrences, so they must not be spliced in while pass one is still
/// scanning; pass two substitutes the placeholder with plain string
/// replacement, never re-matching.
fn combine_tags(html: &str, base: &Path, assets: &AssetMap, profile: &TagProfile) -> String {
    let scanner = TagScanner::new(profile.scan_tag, profile.two_form);
    let placeholder = placeholder_for(profile);

    let mut contents = String::new();
    let mut merged: Vec<Attribute> = Vec::new();
    let mut first_seen = false;

    let pass_one = scanner.replace_all(html, |tag| {
        let (attrs, path) = profile.candidate_path(tag, base)?;
        let content = assets.content(&path)?;

        contents.push_str(content);
        merge_attributes(&mut merged, attrs, profile.dropped_attrs);

        if first_seen {
            Some(String::new())
        } else {
            first_seen = true;
            Some(placeholder.clone())
        }
    });

    if !first_seen {
        return pass_one;
    }

    let combined = format!(
        "<{tag}{attrs}>{contents}</{tag}>",
        tag = profile.output_tag,
        attrs = render_attributes(&merged, &[]),
    );
    pass_one.replacen(&placeholder, &combined, 1)
}

/// Fold one tag's attributes into the merged set; later values overwrite
/// earlier ones under the same name, mirroring document reading order.
fn merge_attributes(merged: &mut Vec<Attribute>, attrs: Vec<Attribute>, dropped: &[&str]) {
    for attr in attrs {
        if dropped.iter().any(|name| attr.name.eq_ignore_ascii_case(name)) {
            continue;
        }

        match merged
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&attr.name))
        {
            Some(existing) => existing.value = attr.value,
            None => merged.push(attr),
        }
    }
}
