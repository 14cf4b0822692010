//! Command line wrapper around the document optimizer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use html_asset_inliner::{BundleOptions, DocumentOptimizer, persist_assets};

/// Inline referenced assets and compact class names in a rendered HTML
/// document.
#[derive(Debug, Parser)]
#[command(name = "html-asset-inliner", version, about)]
struct Cli {
    /// Rendered HTML document to optimize.
    input: PathBuf,

    /// Where to write the rewritten document (stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON options file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that relative `src`/`href` values resolve against.
    #[arg(long)]
    base_url: Option<PathBuf>,

    /// Inline referenced stylesheets.
    #[arg(long)]
    bundle_css: bool,

    /// Inline referenced scripts.
    #[arg(long)]
    bundle_js: bool,

    /// Merge referenced stylesheets into a single tag.
    #[arg(long)]
    combine_css: bool,

    /// Merge referenced scripts into a single tag.
    #[arg(long)]
    combine_js: bool,

    /// Rewrite class names into compact identifiers.
    #[arg(long)]
    minify_css_classes: bool,

    /// Class name exempt from renaming; may be repeated.
    #[arg(long = "whitelist", value_name = "CLASS")]
    classes_whitelist: Vec<String>,

    /// Write mutated CSS/JS contents back to their source files.
    #[arg(long)]
    write_assets: bool,
}

impl Cli {
    fn options(&self, document_dir: &Path) -> Result<BundleOptions> {
        let mut options = match &self.config {
            Some(path) => BundleOptions::from_path(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => BundleOptions::discover(document_dir),
        };

        if let Some(base_url) = &self.base_url {
            options.base_url = Some(base_url.clone());
        }
        options.bundle_css |= self.bundle_css;
        options.bundle_js |= self.bundle_js;
        options.combine_css |= self.combine_css;
        options.combine_js |= self.combine_js;
        options.minify_css_classes |= self.minify_css_classes;
        options
            .classes_whitelist
            .extend(self.classes_whitelist.iter().cloned());

        Ok(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let html = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read document at {}", cli.input.display()))?;
    let document_dir = cli
        .input
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let optimizer = DocumentOptimizer::new(cli.options(document_dir)?);
    let result = optimizer
        .optimize(&html, document_dir)
        .with_context(|| format!("failed to optimize {}", cli.input.display()))?;

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    if cli.write_assets {
        persist_assets(&result.rewritten_assets)?;
    } else {
        for path in result.rewritten_assets.keys() {
            eprintln!(
                "note: {} changed in memory; pass --write-assets to persist it",
                path.display()
            );
        }
    }

    match &cli.output {
        Some(path) => fs::write(path, &result.html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", result.html),
    }

    Ok(())
}
