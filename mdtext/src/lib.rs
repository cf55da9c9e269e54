//! `mdtext`: Markdown document trees, structural rewriting and styled text.
//!
//! A parsed document is a tree of [`BlockNode`]s owning [`InlineNode`]
//! content. This crate provides:
//!
//! - rule-driven rewriting of that tree ([`Rewrite`], [`RewriteInlines`]),
//! - post-order collection over inline content ([`collect`]),
//! - a single-pass renderer from inline content to flat [`StyledText`],
//!   parameterized by an [`InlineTextStyles`] lookup table.
//!
//! # Quick start
//!
//! ```
//! use mdtext::{BlockNode, RenderContext, Rewrite};
//!
//! let blocks = mdtext::parse("Hello **world**\n\n---\n");
//! let blocks = blocks.rewrite(|node| match node {
//!     BlockNode::ThematicBreak => vec![],
//!     other => vec![other],
//! });
//! assert_eq!(blocks.len(), 1);
//!
//! let ctx = RenderContext::default();
//! let text = mdtext::render_blocks(&blocks, &ctx);
//! assert_eq!(text[0].plain(), "Hello world");
//! assert!(text[0].runs()[1].attributes.bold);
//! ```

pub mod collect;
pub mod error;
pub mod markup;
pub mod parse;
pub mod render;
pub mod render_md;
#[cfg(feature = "terminal")]
pub mod render_term;
pub mod rewrite;
pub mod style;
pub mod styled;
pub mod types;
pub mod validate;

pub use collect::{collect_blocks, collect_inlines, link_destinations, plain_text};
pub use error::*;
pub use parse::parse;
pub use render::{RenderContext, render_blocks, render_inlines};
pub use rewrite::{Rewrite, RewriteInlines};
pub use style::{Attributes, Color, InlineTextStyles, Style, StyleFn, StyleSheet, TextStyle};
pub use styled::{Run, StyledText};
pub use types::*;

/// Decode a block sequence from its JSON form.
pub fn from_json(json: &str) -> Result<Vec<BlockNode>> {
    Ok(serde_json::from_str(json)?)
}

/// Encode a block sequence as pretty-printed JSON.
pub fn to_json(blocks: &[BlockNode]) -> Result<String> {
    Ok(serde_json::to_string_pretty(blocks)?)
}

/// Render blocks back to CommonMark.
pub fn to_markdown(blocks: &[BlockNode]) -> String {
    render_md::to_markdown(blocks)
}

/// Validate blocks and return any diagnostics.
pub fn validate(blocks: &[BlockNode]) -> Vec<Diagnostic> {
    validate::validate(blocks)
}
