//! Class-name compaction across HTML, CSS and marked JS calls.

mod names;
mod rename;

pub use names::CompactNameGenerator;
pub use rename::{RenamePlan, plan_renames};
