//! Property-based tests using proptest.
//!
//! These check the structural laws of rewriting and collection on arbitrary
//! trees, and that rendering never panics.

use mdtext::{
    BlockNode, InlineNode, ListItem, RenderContext, Rewrite, RewriteInlines, TableCell, TableRow,
    TaskListItem,
};
use proptest::prelude::*;

fn inline_strategy() -> impl Strategy<Value = InlineNode> {
    let leaf = prop_oneof![
        "[a-z <>/]{0,8}".prop_map(InlineNode::text),
        Just(InlineNode::SoftBreak),
        Just(InlineNode::LineBreak),
        "[a-z]{0,4}".prop_map(InlineNode::code),
        prop_oneof![Just("<br>"), Just("<span>"), Just("<!-- x -->")].prop_map(InlineNode::html),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        let children = prop::collection::vec(inner, 0..4);
        prop_oneof![
            children.clone().prop_map(|children| InlineNode::Emphasis { children }),
            children.clone().prop_map(|children| InlineNode::Strong { children }),
            children.clone().prop_map(|children| InlineNode::Strikethrough { children }),
            ("[a-z/:.]{0,10}", children.clone())
                .prop_map(|(d, children)| InlineNode::link(d, children)),
            ("[a-z.]{0,6}", children).prop_map(|(s, children)| InlineNode::image(s, children)),
        ]
    })
}

fn block_strategy() -> impl Strategy<Value = BlockNode> {
    let inlines = || prop::collection::vec(inline_strategy(), 0..4);
    let leaf = prop_oneof![
        inlines().prop_map(BlockNode::paragraph),
        (1u8..=6, inlines()).prop_map(|(level, content)| BlockNode::heading(level, content)),
        Just(BlockNode::ThematicBreak),
        "[a-z\n]{0,12}".prop_map(|content| BlockNode::CodeBlock {
            fence_info: None,
            content
        }),
        prop::collection::vec(prop::collection::vec(inlines(), 1..3), 1..3).prop_map(|rows| {
            BlockNode::Table {
                column_alignments: vec![],
                rows: rows
                    .into_iter()
                    .map(|cells| TableRow {
                        cells: cells.into_iter().map(TableCell::new).collect(),
                    })
                    .collect(),
            }
        }),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        let children = prop::collection::vec(inner, 0..3);
        prop_oneof![
            children.clone().prop_map(|children| BlockNode::Blockquote { children }),
            (any::<bool>(), prop::collection::vec(children.clone(), 0..3)).prop_map(
                |(is_tight, items)| BlockNode::BulletedList {
                    is_tight,
                    items: items.into_iter().map(ListItem::new).collect(),
                }
            ),
            (any::<bool>(), 0u64..100, prop::collection::vec(children.clone(), 0..3)).prop_map(
                |(is_tight, start, items)| BlockNode::NumberedList {
                    is_tight,
                    start,
                    items: items.into_iter().map(ListItem::new).collect(),
                }
            ),
            (any::<bool>(), prop::collection::vec((any::<bool>(), children), 0..3)).prop_map(
                |(is_tight, items)| BlockNode::TaskList {
                    is_tight,
                    items: items.into_iter().map(|(done, c)| TaskListItem::new(done, c)).collect(),
                }
            ),
        ]
    })
}

fn count_thematic_breaks(blocks: &[BlockNode]) -> usize {
    let mut count = 0;
    blocks.to_vec().rewrite(|node| {
        if node == BlockNode::ThematicBreak {
            count += 1;
        }
        vec![node]
    });
    count
}

proptest! {
    /// Returning every node unchanged yields a structurally equal tree.
    #[test]
    fn identity_block_rewrite(blocks in prop::collection::vec(block_strategy(), 0..4)) {
        prop_assert_eq!(blocks.clone().rewrite(|node| vec![node]), blocks);
    }

    #[test]
    fn identity_inline_rewrite(blocks in prop::collection::vec(block_strategy(), 0..4)) {
        prop_assert_eq!(blocks.clone().rewrite_inlines(|node| vec![node]), blocks);
    }

    /// Deleting one variant removes all of it and nothing else.
    #[test]
    fn deleting_thematic_breaks(blocks in prop::collection::vec(block_strategy(), 0..4)) {
        let out = blocks.clone().rewrite(|node| match node {
            BlockNode::ThematicBreak => vec![],
            other => vec![other],
        });
        prop_assert_eq!(count_thematic_breaks(&out), 0);
        let kept = blocks.iter().filter(|b| **b != BlockNode::ThematicBreak).count();
        prop_assert_eq!(out.len(), kept);
    }

    /// Collect with a rule returning the node yields one entry per node.
    #[test]
    fn collect_visits_every_inline(inlines in prop::collection::vec(inline_strategy(), 0..6)) {
        let total = mdtext::collect_inlines(&inlines, |_| vec![()]).len();
        let rewritten = inlines.clone().rewrite_inlines(|node| vec![node]);
        prop_assert_eq!(total, mdtext::collect_inlines(&rewritten, |_| vec![()]).len());
        // The last result always belongs to the last top-level node.
        if let Some(last) = inlines.last() {
            let labels = mdtext::collect_inlines(&inlines, |node| vec![node.clone()]);
            prop_assert_eq!(labels.last(), Some(last));
        }
    }

    /// Rendering is total and never produces empty runs.
    #[test]
    fn rendering_never_panics(blocks in prop::collection::vec(block_strategy(), 0..4)) {
        let ctx = RenderContext::default().with_base_url_str("https://x.test/").unwrap();
        let fragments = mdtext::render_blocks(&blocks, &ctx);
        for fragment in fragments {
            for run in fragment.runs() {
                prop_assert!(!run.text.is_empty());
            }
        }
    }
}
