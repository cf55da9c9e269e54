//! Structural validation for document trees.
//!
//! Checks constraints the type system cannot express (heading levels, table
//! shape, empty containers). Returns a list of `Diagnostic` items (non-fatal).

use crate::collect::collect_blocks;
use crate::error::{Diagnostic, Severity};
use crate::types::{BlockNode, InlineNode};

/// Validate a block sequence and return any diagnostics.
///
/// This function never modifies the tree.
pub fn validate(blocks: &[BlockNode]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for block in blocks {
        validate_block(block, &mut diagnostics);
    }

    let empty_links = collect_blocks(blocks, |node| match node {
        InlineNode::Link { destination, .. } if destination.trim().is_empty() => vec![()],
        _ => vec![],
    });
    for _ in empty_links {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message: "Link has an empty destination".into(),
            code: Some("V040".into()),
        });
    }

    diagnostics
}

fn validate_block(block: &BlockNode, diagnostics: &mut Vec<Diagnostic>) {
    match block {
        BlockNode::Heading { level, .. } => {
            if !(1..=6).contains(level) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    message: format!("Heading level {level} is outside 1..=6"),
                    code: Some("V010".into()),
                });
            }
        }

        BlockNode::Table {
            column_alignments,
            rows,
        } => {
            for (i, row) in rows.iter().enumerate() {
                if row.cells.len() != column_alignments.len() {
                    diagnostics.push(Diagnostic {
                        severity: Severity::Warning,
                        message: format!(
                            "Table row {} has {} cells but the table has {} columns",
                            i + 1,
                            row.cells.len(),
                            column_alignments.len()
                        ),
                        code: Some("V020".into()),
                    });
                }
            }
        }

        BlockNode::Blockquote { children } => {
            for child in children {
                validate_block(child, diagnostics);
            }
        }

        BlockNode::BulletedList { items, .. } | BlockNode::NumberedList { items, .. } => {
            if items.is_empty() {
                push_empty_list(diagnostics);
            }
            for child in items.iter().flat_map(|item| &item.children) {
                validate_block(child, diagnostics);
            }
        }

        BlockNode::TaskList { items, .. } => {
            if items.is_empty() {
                push_empty_list(diagnostics);
            }
            for child in items.iter().flat_map(|item| &item.children) {
                validate_block(child, diagnostics);
            }
        }

        BlockNode::CodeBlock { .. }
        | BlockNode::HtmlBlock { .. }
        | BlockNode::Paragraph { .. }
        | BlockNode::ThematicBreak => {}
    }
}

fn push_empty_list(diagnostics: &mut Vec<Diagnostic>) {
    diagnostics.push(Diagnostic {
        severity: Severity::Warning,
        message: "List has no items".into(),
        code: Some("V030".into()),
    });
}
