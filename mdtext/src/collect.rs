//! Post-order collection over inline content.
//!
//! For every node the results of its children come first (left to right),
//! followed by the rule's result for the node itself.

use std::convert::Infallible;

use crate::types::{BlockNode, InlineNode};

impl InlineNode {
    pub fn try_collect<T, E, F>(&self, rule: &mut F) -> Result<Vec<T>, E>
    where
        F: FnMut(&InlineNode) -> Result<Vec<T>, E>,
    {
        let mut out = try_collect_inlines(self.children(), rule)?;
        out.extend(rule(self)?);
        Ok(out)
    }

    pub fn collect<T, F>(&self, mut rule: F) -> Vec<T>
    where
        F: FnMut(&InlineNode) -> Vec<T>,
    {
        let result: Result<_, Infallible> =
            self.try_collect(&mut |node: &InlineNode| Ok(rule(node)));
        match result {
            Ok(values) => values,
            Err(never) => match never {},
        }
    }
}

/// Collect over an inline sequence, concatenating per-node results in order.
pub fn try_collect_inlines<T, E, F>(inlines: &[InlineNode], rule: &mut F) -> Result<Vec<T>, E>
where
    F: FnMut(&InlineNode) -> Result<Vec<T>, E>,
{
    let mut out = Vec::new();
    for inline in inlines {
        out.extend(inline.try_collect(rule)?);
    }
    Ok(out)
}

pub fn collect_inlines<T, F>(inlines: &[InlineNode], mut rule: F) -> Vec<T>
where
    F: FnMut(&InlineNode) -> Vec<T>,
{
    let result: Result<_, Infallible> =
        try_collect_inlines(inlines, &mut |node: &InlineNode| Ok(rule(node)));
    match result {
        Ok(values) => values,
        Err(never) => match never {},
    }
}

/// Collect over the inline content of every block, in document order.
///
/// Table cells are visited row by row; leaf blocks without inline content
/// contribute nothing.
pub fn try_collect_blocks<T, E, F>(blocks: &[BlockNode], rule: &mut F) -> Result<Vec<T>, E>
where
    F: FnMut(&InlineNode) -> Result<Vec<T>, E>,
{
    let mut out = Vec::new();
    for block in blocks {
        match block {
            BlockNode::Blockquote { children } => out.extend(try_collect_blocks(children, rule)?),
            BlockNode::BulletedList { items, .. } | BlockNode::NumberedList { items, .. } => {
                for item in items {
                    out.extend(try_collect_blocks(&item.children, rule)?);
                }
            }
            BlockNode::TaskList { items, .. } => {
                for item in items {
                    out.extend(try_collect_blocks(&item.children, rule)?);
                }
            }
            BlockNode::Paragraph { content } | BlockNode::Heading { content, .. } => {
                out.extend(try_collect_inlines(content, rule)?);
            }
            BlockNode::Table { rows, .. } => {
                for cell in rows.iter().flat_map(|row| &row.cells) {
                    out.extend(try_collect_inlines(&cell.content, rule)?);
                }
            }
            BlockNode::CodeBlock { .. }
            | BlockNode::HtmlBlock { .. }
            | BlockNode::ThematicBreak => {}
        }
    }
    Ok(out)
}

pub fn collect_blocks<T, F>(blocks: &[BlockNode], mut rule: F) -> Vec<T>
where
    F: FnMut(&InlineNode) -> Vec<T>,
{
    let result: Result<_, Infallible> =
        try_collect_blocks(blocks, &mut |node: &InlineNode| Ok(rule(node)));
    match result {
        Ok(values) => values,
        Err(never) => match never {},
    }
}

/// Every link destination, in post-order.
pub fn link_destinations(blocks: &[BlockNode]) -> Vec<String> {
    collect_blocks(blocks, |node| match node {
        InlineNode::Link { destination, .. } => vec![destination.clone()],
        _ => vec![],
    })
}

/// Plain-text projection of inline content.
///
/// Image descriptions are kept, since this is text rather than display.
pub fn plain_text(inlines: &[InlineNode]) -> String {
    collect_inlines(inlines, |node| match node {
        InlineNode::Text { content }
        | InlineNode::Code { content }
        | InlineNode::Html { content } => {
            vec![content.clone()]
        }
        InlineNode::SoftBreak => vec![" ".to_string()],
        InlineNode::LineBreak => vec!["\n".to_string()],
        _ => vec![],
    })
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ListItem, TableCell, TableRow};
    use pretty_assertions::assert_eq;

    fn label(node: &InlineNode) -> String {
        match node {
            InlineNode::Text { content } => content.clone(),
            InlineNode::Emphasis { .. } => "em".into(),
            InlineNode::Strong { .. } => "strong".into(),
            InlineNode::Link { destination, .. } => format!("link:{destination}"),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn results_are_post_order() {
        let inlines = vec![
            InlineNode::Emphasis {
                children: vec![InlineNode::text("a1"), InlineNode::text("a2")],
            },
            InlineNode::Strong {
                children: vec![InlineNode::text("b1")],
            },
        ];
        let labels = collect_inlines(&inlines, |node| vec![label(node)]);
        assert_eq!(labels, vec!["a1", "a2", "em", "b1", "strong"]);
    }

    #[test]
    fn deepest_first_within_subtree() {
        let node = InlineNode::link(
            "/x",
            vec![InlineNode::Strong {
                children: vec![InlineNode::text("deep")],
            }],
        );
        assert_eq!(node.collect(|n| vec![label(n)]), vec!["deep", "strong", "link:/x"]);
    }

    #[test]
    fn rule_may_return_many_or_none() {
        let inlines = vec![InlineNode::text("ab"), InlineNode::SoftBreak];
        let chars: Vec<char> = collect_inlines(&inlines, |node| match node {
            InlineNode::Text { content } => content.chars().collect(),
            _ => vec![],
        });
        assert_eq!(chars, vec!['a', 'b']);
    }

    #[test]
    fn errors_abort_collection() {
        let inlines = vec![
            InlineNode::text("ok"),
            InlineNode::code("bad"),
            InlineNode::text("never"),
        ];
        let mut visited = Vec::new();
        let mut rule = |node: &InlineNode| {
            visited.push(label(node));
            match node {
                InlineNode::Code { content } => Err(content.clone()),
                _ => Ok(vec![]),
            }
        };
        let result: Result<Vec<()>, String> = try_collect_inlines(&inlines, &mut rule);
        assert_eq!(result, Err("bad".to_string()));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn link_destinations_across_blocks() {
        let blocks = vec![
            BlockNode::paragraph(vec![InlineNode::link("/a", vec![InlineNode::text("a")])]),
            BlockNode::BulletedList {
                is_tight: true,
                items: vec![ListItem::new(vec![BlockNode::paragraph(vec![InlineNode::link(
                    "/outer",
                    vec![InlineNode::link("/inner", vec![])],
                )])])],
            },
            BlockNode::Table {
                column_alignments: vec![],
                rows: vec![TableRow {
                    cells: vec![TableCell::new(vec![InlineNode::link("/cell", vec![])])],
                }],
            },
            BlockNode::CodeBlock {
                fence_info: None,
                content: "[x](/ignored)".into(),
            },
        ];
        assert_eq!(link_destinations(&blocks), vec!["/a", "/inner", "/outer", "/cell"]);
    }

    #[test]
    fn plain_text_projection() {
        let inlines = vec![
            InlineNode::text("Hello"),
            InlineNode::SoftBreak,
            InlineNode::Strong {
                children: vec![InlineNode::code("world")],
            },
            InlineNode::LineBreak,
            InlineNode::image("i.png", vec![InlineNode::text("alt")]),
        ];
        assert_eq!(plain_text(&inlines), "Hello world\nalt");
    }
}
