//! Structural tree rewriting.
//!
//! Rules are plain closures mapping one node to zero or more replacement
//! nodes. Block rules see each container after its children have already been
//! rewritten; inline rules likewise see wrappers with rewritten children. A
//! rule's output is final for that position and is not traversed again.
//!
//! Fallible rules return `Result`; the first error aborts the whole traversal
//! and no partial tree is produced.

use std::convert::Infallible;

use crate::types::{BlockNode, InlineNode, ListItem, TableCell, TableRow, TaskListItem};

/// Block-rule rewriting, available on a single block and on block sequences.
pub trait Rewrite: Sized {
    /// Rewrite with a fallible block rule.
    fn try_rewrite<E, F>(self, rule: &mut F) -> Result<Vec<BlockNode>, E>
    where
        F: FnMut(BlockNode) -> Result<Vec<BlockNode>, E>;

    /// Rewrite with a block rule that cannot fail.
    fn rewrite<F>(self, mut rule: F) -> Vec<BlockNode>
    where
        F: FnMut(BlockNode) -> Vec<BlockNode>,
    {
        infallible(self.try_rewrite(&mut |node| Ok(rule(node))))
    }
}

/// Inline-rule rewriting, reachable from blocks and from inline content.
pub trait RewriteInlines: Sized {
    type Output;

    fn try_rewrite_inlines<E, F>(self, rule: &mut F) -> Result<Self::Output, E>
    where
        F: FnMut(InlineNode) -> Result<Vec<InlineNode>, E>;

    fn rewrite_inlines<F>(self, mut rule: F) -> Self::Output
    where
        F: FnMut(InlineNode) -> Vec<InlineNode>,
    {
        infallible(self.try_rewrite_inlines(&mut |node| Ok(rule(node))))
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

// ------------------------------------------------------------------
// Block rules
// ------------------------------------------------------------------

impl Rewrite for Vec<BlockNode> {
    fn try_rewrite<E, F>(self, rule: &mut F) -> Result<Vec<BlockNode>, E>
    where
        F: FnMut(BlockNode) -> Result<Vec<BlockNode>, E>,
    {
        let mut out = Vec::with_capacity(self.len());
        for block in self {
            out.extend(block.try_rewrite(rule)?);
        }
        Ok(out)
    }
}

impl Rewrite for BlockNode {
    fn try_rewrite<E, F>(self, rule: &mut F) -> Result<Vec<BlockNode>, E>
    where
        F: FnMut(BlockNode) -> Result<Vec<BlockNode>, E>,
    {
        let rebuilt = match self {
            BlockNode::Blockquote { children } => BlockNode::Blockquote {
                children: children.try_rewrite(rule)?,
            },
            BlockNode::BulletedList { is_tight, items } => BlockNode::BulletedList {
                is_tight,
                items: rewrite_items(items, |children| children.try_rewrite(rule))?,
            },
            BlockNode::NumberedList {
                is_tight,
                start,
                items,
            } => BlockNode::NumberedList {
                is_tight,
                start,
                items: rewrite_items(items, |children| children.try_rewrite(rule))?,
            },
            BlockNode::TaskList { is_tight, items } => BlockNode::TaskList {
                is_tight,
                items: rewrite_task_items(items, |children| children.try_rewrite(rule))?,
            },
            leaf => leaf,
        };

        let out = rule(rebuilt)?;
        if out.len() != 1 {
            log::trace!("block rule produced {} nodes", out.len());
        }
        Ok(out)
    }
}

fn rewrite_items<E>(
    items: Vec<ListItem>,
    mut f: impl FnMut(Vec<BlockNode>) -> Result<Vec<BlockNode>, E>,
) -> Result<Vec<ListItem>, E> {
    items
        .into_iter()
        .map(|item| Ok(ListItem::new(f(item.children)?)))
        .collect()
}

fn rewrite_task_items<E>(
    items: Vec<TaskListItem>,
    mut f: impl FnMut(Vec<BlockNode>) -> Result<Vec<BlockNode>, E>,
) -> Result<Vec<TaskListItem>, E> {
    items
        .into_iter()
        .map(|item| Ok(TaskListItem::new(item.is_completed, f(item.children)?)))
        .collect()
}

// ------------------------------------------------------------------
// Inline rules
// ------------------------------------------------------------------

impl RewriteInlines for Vec<BlockNode> {
    type Output = Vec<BlockNode>;

    fn try_rewrite_inlines<E, F>(self, rule: &mut F) -> Result<Vec<BlockNode>, E>
    where
        F: FnMut(InlineNode) -> Result<Vec<InlineNode>, E>,
    {
        let mut out = Vec::with_capacity(self.len());
        for block in self {
            out.extend(block.try_rewrite_inlines(rule)?);
        }
        Ok(out)
    }
}

impl RewriteInlines for BlockNode {
    type Output = Vec<BlockNode>;

    /// Always yields exactly one block: restructuring happens only inside the
    /// inline content.
    fn try_rewrite_inlines<E, F>(self, rule: &mut F) -> Result<Vec<BlockNode>, E>
    where
        F: FnMut(InlineNode) -> Result<Vec<InlineNode>, E>,
    {
        let block = match self {
            BlockNode::Blockquote { children } => BlockNode::Blockquote {
                children: children.try_rewrite_inlines(rule)?,
            },
            BlockNode::BulletedList { is_tight, items } => BlockNode::BulletedList {
                is_tight,
                items: rewrite_items(items, |children| children.try_rewrite_inlines(rule))?,
            },
            BlockNode::NumberedList {
                is_tight,
                start,
                items,
            } => BlockNode::NumberedList {
                is_tight,
                start,
                items: rewrite_items(items, |children| children.try_rewrite_inlines(rule))?,
            },
            BlockNode::TaskList { is_tight, items } => BlockNode::TaskList {
                is_tight,
                items: rewrite_task_items(items, |children| children.try_rewrite_inlines(rule))?,
            },
            BlockNode::Paragraph { content } => BlockNode::Paragraph {
                content: content.try_rewrite_inlines(rule)?,
            },
            BlockNode::Heading { level, content } => BlockNode::Heading {
                level,
                content: content.try_rewrite_inlines(rule)?,
            },
            BlockNode::Table {
                column_alignments,
                rows,
            } => BlockNode::Table {
                column_alignments,
                rows: rows
                    .into_iter()
                    .map(|row| -> Result<TableRow, E> {
                        let cells = row
                            .cells
                            .into_iter()
                            .map(|cell| Ok(TableCell::new(cell.content.try_rewrite_inlines(rule)?)))
                            .collect::<Result<Vec<_>, E>>()?;
                        Ok(TableRow { cells })
                    })
                    .collect::<Result<Vec<_>, E>>()?,
            },
            leaf @ (BlockNode::CodeBlock { .. }
            | BlockNode::HtmlBlock { .. }
            | BlockNode::ThematicBreak) => leaf,
        };
        Ok(vec![block])
    }
}

impl RewriteInlines for Vec<InlineNode> {
    type Output = Vec<InlineNode>;

    fn try_rewrite_inlines<E, F>(self, rule: &mut F) -> Result<Vec<InlineNode>, E>
    where
        F: FnMut(InlineNode) -> Result<Vec<InlineNode>, E>,
    {
        let mut out = Vec::with_capacity(self.len());
        for inline in self {
            out.extend(inline.try_rewrite_inlines(rule)?);
        }
        Ok(out)
    }
}

impl RewriteInlines for InlineNode {
    type Output = Vec<InlineNode>;

    fn try_rewrite_inlines<E, F>(self, rule: &mut F) -> Result<Vec<InlineNode>, E>
    where
        F: FnMut(InlineNode) -> Result<Vec<InlineNode>, E>,
    {
        let (shell, children) = self.take_children();
        let rebuilt = if children.is_empty() {
            shell
        } else {
            shell.with_children(children.try_rewrite_inlines(rule)?)
        };
        rule(rebuilt)
    }
}
