//! Reference resolution and asset content loading for one document.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use std::thread;

use anyhow::{Context, Result};
use regex::Regex;

/// Kind of referenced asset, derived from the tag that referenced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Stylesheet referenced by `<link rel="stylesheet" href>`.
    Css,
    /// Script referenced by `<script src>`.
    Js,
}

fn remote_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:[a-z][a-z0-9+.-]*:)?//").expect("invalid remote reference regex")
    })
}

/// Whether a locator value points outside the local file tree.
///
/// Absolute URLs (`scheme://`) and protocol-relative references (`//`) are
/// never loaded; their tags stay external references and are not bundling
/// candidates.
pub fn is_remote_reference(value: &str) -> bool {
    remote_reference_pattern().is_match(value)
}

/// Resolve a tag locator value against the configured base directory.
///
/// Returns `None` for empty or remote references. A leading `/` is treated as
/// base-relative and stripped before joining, never as the filesystem root.
/// The result is lexically normalized so the same file always maps to the
/// same asset key.
pub fn resolve_reference(base: &Path, reference: &str) -> Option<PathBuf> {
    let trimmed = reference.trim();
    if trimmed.is_empty() || is_remote_reference(trimmed) {
        return None;
    }

    Some(normalize_path(&base.join(trimmed.trim_start_matches('/'))))
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[derive(Debug)]
struct AssetEntry {
    kind: AssetKind,
    content: Option<String>,
}

/// Per-document ledger of referenced files and their loaded contents.
///
/// Keys are absolute, normalized paths; entries are registered once per
/// distinct path no matter how many tags reference it. During a pipeline run
/// the map is populated completely before any rewrite pass consults it, and
/// after class renaming it holds the authoritative rewritten contents.
#[derive(Debug, Default)]
pub struct AssetMap {
    entries: BTreeMap<PathBuf, AssetEntry>,
}

impl AssetMap {
    /// Empty map for one document invocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path for loading; repeat registrations are ignored.
    pub fn request(&mut self, path: PathBuf, kind: AssetKind) {
        self.entries
            .entry(path)
            .or_insert(AssetEntry { kind, content: None });
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no path has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loaded content for a path, if registered and loaded.
    pub fn content(&self, path: &Path) -> Option<&str> {
        self.entries
            .get(path)
            .and_then(|entry| entry.content.as_deref())
    }

    /// Read every pending asset from disk, fanning the reads out and joining
    /// before returning.
    ///
    /// A missing or unreadable file is a fatal load failure carrying the
    /// offending path; it is never silently treated as empty content.
    pub fn load_all(&mut self) -> Result<()> {
        let pending: Vec<PathBuf> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.content.is_none())
            .map(|(path, _)| path.clone())
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        let loaded: Vec<(PathBuf, Result<String>)> = thread::scope(|scope| {
            let handles: Vec<_> = pending
                .into_iter()
                .map(|path| {
                    scope.spawn(move || {
                        let content = fs::read_to_string(&path).with_context(|| {
                            format!("failed to read referenced asset at {}", path.display())
                        });
                        (path, content)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().expect("asset reader thread panicked"))
                .collect()
        });

        for (path, content) in loaded {
            let content = content?;
            if let Some(entry) = self.entries.get_mut(&path) {
                entry.content = Some(content);
            }
        }

        Ok(())
    }

    /// Iterate the loaded contents of one asset kind in path order.
    pub fn contents_of_kind(&self, kind: AssetKind) -> impl Iterator<Item = (&Path, &str)> {
        self.entries.iter().filter_map(move |(path, entry)| {
            if entry.kind != kind {
                return None;
            }
            entry.content.as_deref().map(|content| (path.as_path(), content))
        })
    }

    /// Rewrite every loaded content of one kind, returning the paths whose
    /// content actually changed.
    pub fn rewrite_contents_of_kind<F>(&mut self, kind: AssetKind, mut rewrite: F) -> Vec<PathBuf>
    where
        F: FnMut(&str) -> String,
    {
        let mut changed = Vec::new();
        for (path, entry) in &mut self.entries {
            if entry.kind != kind {
                continue;
            }
            let Some(content) = entry.content.as_ref() else {
                continue;
            };

            let rewritten = rewrite(content);
            if rewritten != *content {
                entry.content = Some(rewritten);
                changed.push(path.clone());
            }
        }
        changed
    }
}

/// Write rewritten asset contents back to disk, fanning the writes out and
/// joining before returning. The first failure is fatal and names the
/// offending path.
pub fn persist_assets(assets: &BTreeMap<PathBuf, String>) -> Result<()> {
    if assets.is_empty() {
        return Ok(());
    }

    thread::scope(|scope| {
        let handles: Vec<_> = assets
            .iter()
            .map(|(path, content)| {
                scope.spawn(move || {
                    fs::write(path, content).with_context(|| {
                        format!("failed to write rewritten asset at {}", path.display())
                    })
                })
            })
            .collect();

        handles
            .into_iter()
            .try_for_each(|handle| handle.join().expect("asset writer thread panicked"))
    })
}
