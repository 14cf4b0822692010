//! Best-effort HTML scanning split into focused submodules.
//!
//! The tag scanner locates candidate tags and hands their raw attribute
//! substring to the attribute tokenizer; neither builds an AST and both
//! tolerate only the token grammar they state. Malformed markup is simply
//! never matched and therefore never rewritten.

pub mod attrs;
pub mod tags;

pub use attrs::{Attribute, attribute_value, parse_attributes, render_attributes};
pub use tags::{TagMatch, TagScanner, is_stylesheet_link};
