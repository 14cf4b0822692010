#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod assets;
pub mod config;
pub mod minify;
pub mod optimizer;
pub mod rewrite;
pub mod scan;

pub use assets::{AssetKind, AssetMap, persist_assets};
pub use config::BundleOptions;
pub use optimizer::{DocumentOptimizer, OptimizedDocument};
