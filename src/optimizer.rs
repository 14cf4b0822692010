//! Per-document pipeline tying scanning, loading, renaming and rewriting
//! together.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::assets::{AssetKind, AssetMap};
use crate::config::BundleOptions;
use crate::minify::plan_renames;
use crate::rewrite::{
    SCRIPT_PROFILE, STYLESHEET_PROFILE, TagProfile, combine_scripts, combine_stylesheets,
    inline_scripts, inline_stylesheets,
};
use crate::scan::TagScanner;

/// Outcome of optimizing one document.
#[derive(Debug)]
pub struct OptimizedDocument {
    /// Rewritten HTML text.
    pub html: String,
    /// Mutated asset contents the caller should persist: paths whose content
    /// was changed by class renaming but whose asset kind was not inlined
    /// into the document.
    pub rewritten_assets: BTreeMap<PathBuf, String>,
    /// Advisory warnings gathered during the run (single-use class names).
    pub warnings: Vec<String>,
}

/// Runs the configured passes over one rendered HTML document at a time.
///
/// Every table built during a run (asset map, usage counts, rename table) is
/// local to that invocation, so one optimizer can serve documents processed
/// concurrently by the surrounding pipeline.
pub struct DocumentOptimizer {
    options: BundleOptions,
}

impl DocumentOptimizer {
    /// Create an optimizer for the provided options.
    pub fn new(options: BundleOptions) -> Self {
        Self { options }
    }

    /// The options this optimizer runs with.
    pub fn options(&self) -> &BundleOptions {
        &self.options
    }

    /// Optimize one document.
    ///
    /// `document_dir` is the directory of the document itself and serves as
    /// the resolution base unless the options name a `base_url`. All
    /// referenced assets are loaded to completion before any text is
    /// rewritten; a failed load aborts the document.
    pub fn optimize(&self, html: &str, document_dir: &Path) -> Result<OptimizedDocument> {
        let base = self.resolution_base(document_dir)?;

        let mut assets = AssetMap::new();
        if self.options.css_assets_wanted() {
            collect_references(html, &base, &STYLESHEET_PROFILE, AssetKind::Css, &mut assets);
        }
        if self.options.js_assets_wanted() {
            collect_references(html, &base, &SCRIPT_PROFILE, AssetKind::Js, &mut assets);
        }
        assets.load_all()?;

        let mut output = html.to_string();
        let mut warnings = Vec::new();
        let mut changed_css = Vec::new();
        let mut changed_js = Vec::new();

        if self.options.minify_css_classes {
            let plan = plan_renames(&output, &assets, &self.options.classes_whitelist);
            warnings = plan.warnings.clone();
            output = plan.rewrite_html(&output);
            changed_css = assets.rewrite_contents_of_kind(AssetKind::Css, |css| plan.rewrite_css(css));
            changed_js = assets.rewrite_contents_of_kind(AssetKind::Js, |js| plan.rewrite_js(js));
        }

        if self.options.combine_css {
            output = combine_stylesheets(&output, &base, &assets);
        } else if self.options.bundle_css {
            output = inline_stylesheets(&output, &base, &assets);
        }

        if self.options.combine_js {
            output = combine_scripts(&output, &base, &assets);
        } else if self.options.bundle_js {
            output = inline_scripts(&output, &base, &assets);
        }

        let mut rewritten_assets = BTreeMap::new();
        if !self.options.css_inlining() {
            copy_changed(&assets, &changed_css, &mut rewritten_assets);
        }
        if !self.options.js_inlining() {
            copy_changed(&assets, &changed_js, &mut rewritten_assets);
        }

        Ok(OptimizedDocument {
            html: output,
            rewritten_assets,
            warnings,
        })
    }

    fn resolution_base(&self, document_dir: &Path) -> Result<PathBuf> {
        let base = self
            .options
            .base_url
            .as_deref()
            .unwrap_or(document_dir);
        if base.is_absolute() {
            return Ok(base.to_path_buf());
        }

        let cwd = env::current_dir().context("failed to determine working directory")?;
        Ok(cwd.join(base))
    }
}

/// Register every loadable reference found for one tag profile.
fn collect_references(
    html: &str,
    base: &Path,
    profile: &TagProfile,
    kind: AssetKind,
    assets: &mut AssetMap,
) {
    let scanner = TagScanner::new(profile.scan_tag, profile.two_form);
    for tag in scanner.matches(html) {
        if let Some((_, path)) = profile.candidate_path(&tag, base) {
            assets.request(path, kind);
        }
    }
}

fn copy_changed(
    assets: &AssetMap,
    changed: &[PathBuf],
    rewritten: &mut BTreeMap<PathBuf, String>,
) {
    for path in changed {
        if let Some(content) = assets.content(path) {
            rewritten.insert(path.clone(), content.to_string());
        }
    }
}
