//! Bundling options recognized by the optimizer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "inliner.config.json";

/// Per-invocation options controlling inlining, combining and renaming.
///
/// All fields default to off/empty; unknown JSON keys are ignored so config
/// files can be shared with other build tooling.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundleOptions {
    /// Directory that relative `src`/`href` values resolve against.
    ///
    /// When unset, each document resolves against its own directory.
    pub base_url: Option<PathBuf>,
    /// Inline each referenced stylesheet into its own `<style>` tag.
    pub bundle_css: bool,
    /// Inline each referenced script into its own `<script>` tag.
    pub bundle_js: bool,
    /// Merge all referenced stylesheets into one `<style>` tag (implies
    /// inlining).
    pub combine_css: bool,
    /// Merge all referenced scripts into one `<script>` tag (implies
    /// inlining).
    pub combine_js: bool,
    /// Rewrite class names into compact identifiers across HTML, CSS and
    /// marked JS calls.
    pub minify_css_classes: bool,
    /// Class names exempt from counting and renaming, in order.
    pub classes_whitelist: Vec<String>,
}

impl BundleOptions {
    /// Attempt to load options from the conventional config file in the
    /// provided directory, falling back to defaults when it is absent or
    /// unparsable.
    pub fn discover(document_dir: &Path) -> Self {
        Self::from_path(&document_dir.join(DEFAULT_CONFIG_FILE)).unwrap_or_default()
    }

    /// Read options from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Whether stylesheet references end up inlined into the document.
    pub fn css_inlining(&self) -> bool {
        self.bundle_css || self.combine_css
    }

    /// Whether script references end up inlined into the document.
    pub fn js_inlining(&self) -> bool {
        self.bundle_js || self.combine_js
    }

    /// Whether stylesheet contents must be loaded at all.
    pub fn css_assets_wanted(&self) -> bool {
        self.css_inlining() || self.minify_css_classes
    }

    /// Whether script contents must be loaded at all.
    pub fn js_assets_wanted(&self) -> bool {
        self.js_inlining() || self.minify_css_classes
    }
}
