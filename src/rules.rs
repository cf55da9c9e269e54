//! Built-in rewrite rules selectable from the command line or `mdtext.json`.

use mdtext::{BlockNode, InlineNode, Rewrite, RewriteInlines};

use crate::config::RewriteDefaults;

/// Which built-in rules to apply.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub drop_images: bool,
    pub unwrap_links: bool,
    pub drop_html: bool,
}

impl RuleSet {
    /// Merge command-line switches over config defaults. A switch can only
    /// turn a rule on.
    pub fn from_flags(
        defaults: RewriteDefaults,
        drop_images: bool,
        unwrap_links: bool,
        drop_html: bool,
    ) -> Self {
        Self {
            drop_images: defaults.drop_images || drop_images,
            unwrap_links: defaults.unwrap_links || unwrap_links,
            drop_html: defaults.drop_html || drop_html,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the selected rules, inline rules first.
    pub fn apply(&self, blocks: Vec<BlockNode>) -> Vec<BlockNode> {
        if self.is_empty() {
            return blocks;
        }
        let rules = *self;
        let blocks = blocks.rewrite_inlines(|node| rules.inline_rule(node));
        if rules.drop_html {
            blocks.rewrite(|node| match node {
                BlockNode::HtmlBlock { .. } => vec![],
                other => vec![other],
            })
        } else {
            blocks
        }
    }

    fn inline_rule(&self, node: InlineNode) -> Vec<InlineNode> {
        match node {
            InlineNode::Image { .. } if self.drop_images => vec![],
            InlineNode::Link { children, .. } if self.unwrap_links => children,
            InlineNode::Html { .. } if self.drop_html => vec![],
            other => vec![other],
        }
    }
}
