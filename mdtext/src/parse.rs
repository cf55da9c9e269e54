//! Markdown to tree adapter.
//!
//! Tokenizing is left entirely to `pulldown-cmark`; this module only folds
//! its event stream into [`BlockNode`] / [`InlineNode`] values.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use crate::types::{Alignment, BlockNode, InlineNode, ListItem, TableCell, TableRow, TaskListItem};

/// Parse CommonMark (plus GFM tables, strikethrough and task lists) into a
/// block sequence.
///
/// This function never panics; unsupported constructs are skipped.
pub fn parse(markdown: &str) -> Vec<BlockNode> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        builder.event(event);
    }
    let blocks = builder.finish();
    log::debug!("parsed {} top-level blocks", blocks.len());
    blocks
}

#[derive(Debug, Clone, Copy)]
enum InlineKind {
    Emphasis,
    Strong,
    Strikethrough,
}

#[derive(Debug)]
enum Frame {
    Quote {
        children: Vec<BlockNode>,
    },
    List {
        start: Option<u64>,
        loose: bool,
        items: Vec<(Option<bool>, Vec<BlockNode>)>,
    },
    Item {
        checked: Option<bool>,
        children: Vec<BlockNode>,
        /// Inline content of a tight item, not yet wrapped in a paragraph.
        inlines: Vec<InlineNode>,
    },
    Paragraph {
        content: Vec<InlineNode>,
    },
    Heading {
        level: u8,
        content: Vec<InlineNode>,
    },
    Table {
        alignments: Vec<Alignment>,
        rows: Vec<TableRow>,
    },
    Row {
        cells: Vec<TableCell>,
    },
    Cell {
        content: Vec<InlineNode>,
    },
    Styled {
        kind: InlineKind,
        children: Vec<InlineNode>,
    },
    Link {
        destination: String,
        children: Vec<InlineNode>,
    },
    Image {
        source: String,
        children: Vec<InlineNode>,
    },
    Code {
        fence_info: Option<String>,
        content: String,
    },
    Html {
        content: String,
    },
    /// A construct we do not model; its content is dropped.
    Ignored,
}

#[derive(Debug, Default)]
struct TreeBuilder {
    root: Vec<BlockNode>,
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => match self.stack.last_mut() {
                Some(Frame::Code { content, .. }) | Some(Frame::Html { content }) => {
                    content.push_str(&text)
                }
                _ => self.push_inline(InlineNode::text(text.into_string())),
            },
            Event::Code(code) => self.push_inline(InlineNode::code(code.into_string())),
            Event::InlineHtml(html) => self.push_inline(InlineNode::html(html.into_string())),
            Event::Html(html) => match self.stack.last_mut() {
                Some(Frame::Html { content }) => content.push_str(&html),
                _ => self.push_block(BlockNode::HtmlBlock {
                    content: html.into_string(),
                }),
            },
            Event::FootnoteReference(label) => {
                self.push_inline(InlineNode::text(format!("[^{}]", &*label)))
            }
            Event::SoftBreak => self.push_inline(InlineNode::SoftBreak),
            Event::HardBreak => self.push_inline(InlineNode::LineBreak),
            Event::Rule => self.push_block(BlockNode::ThematicBreak),
            Event::TaskListMarker(done) => {
                // Loose items report the marker inside their first paragraph.
                let item = self.stack.iter_mut().rev().find_map(|frame| match frame {
                    Frame::Item { checked, .. } => Some(checked),
                    _ => None,
                });
                if let Some(checked) = item {
                    *checked = Some(done);
                }
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => {
                self.mark_enclosing_list_loose();
                Frame::Paragraph { content: Vec::new() }
            }
            Tag::Heading { level, .. } => Frame::Heading {
                level: heading_level(level),
                content: Vec::new(),
            },
            Tag::BlockQuote(_) => {
                self.flush_item_inlines();
                Frame::Quote { children: Vec::new() }
            }
            Tag::CodeBlock(kind) => {
                self.flush_item_inlines();
                let fence_info = match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        Some(info.trim().to_string())
                    }
                    _ => None,
                };
                Frame::Code {
                    fence_info,
                    content: String::new(),
                }
            }
            Tag::HtmlBlock => {
                self.flush_item_inlines();
                Frame::Html { content: String::new() }
            }
            Tag::List(start) => {
                self.flush_item_inlines();
                Frame::List {
                    start,
                    loose: false,
                    items: Vec::new(),
                }
            }
            Tag::Item => Frame::Item {
                checked: None,
                children: Vec::new(),
                inlines: Vec::new(),
            },
            Tag::Table(alignments) => Frame::Table {
                alignments: alignments.into_iter().map(alignment).collect(),
                rows: Vec::new(),
            },
            Tag::TableHead | Tag::TableRow => Frame::Row { cells: Vec::new() },
            Tag::TableCell => Frame::Cell { content: Vec::new() },
            Tag::Emphasis => Frame::Styled {
                kind: InlineKind::Emphasis,
                children: Vec::new(),
            },
            Tag::Strong => Frame::Styled {
                kind: InlineKind::Strong,
                children: Vec::new(),
            },
            Tag::Strikethrough => Frame::Styled {
                kind: InlineKind::Strikethrough,
                children: Vec::new(),
            },
            Tag::Link { dest_url, .. } => Frame::Link {
                destination: dest_url.into_string(),
                children: Vec::new(),
            },
            Tag::Image { dest_url, .. } => Frame::Image {
                source: dest_url.into_string(),
                children: Vec::new(),
            },
            _ => Frame::Ignored,
        };
        self.stack.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Quote { children } => self.push_block(BlockNode::Blockquote { children }),
            Frame::List {
                start,
                loose,
                items,
            } => self.push_block(finish_list(start, !loose, items)),
            Frame::Item {
                checked,
                mut children,
                inlines,
            } => {
                if !inlines.is_empty() {
                    children.push(BlockNode::Paragraph { content: inlines });
                }
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push((checked, children));
                }
            }
            Frame::Paragraph { content } => self.push_block(BlockNode::Paragraph { content }),
            Frame::Heading { level, content } => {
                self.push_block(BlockNode::Heading { level, content })
            }
            Frame::Table { alignments, rows } => self.push_block(BlockNode::Table {
                column_alignments: alignments,
                rows,
            }),
            Frame::Row { cells } => {
                if let Some(Frame::Table { rows, .. }) = self.stack.last_mut() {
                    rows.push(TableRow { cells });
                }
            }
            Frame::Cell { content } => {
                if let Some(Frame::Row { cells }) = self.stack.last_mut() {
                    cells.push(TableCell::new(content));
                }
            }
            Frame::Styled { kind, children } => self.push_inline(match kind {
                InlineKind::Emphasis => InlineNode::Emphasis { children },
                InlineKind::Strong => InlineNode::Strong { children },
                InlineKind::Strikethrough => InlineNode::Strikethrough { children },
            }),
            Frame::Link {
                destination,
                children,
            } => self.push_inline(InlineNode::Link {
                destination,
                children,
            }),
            Frame::Image { source, children } => {
                self.push_inline(InlineNode::Image { source, children })
            }
            Frame::Code {
                fence_info,
                content,
            } => self.push_block(BlockNode::CodeBlock {
                fence_info,
                content,
            }),
            Frame::Html { content } => self.push_block(BlockNode::HtmlBlock { content }),
            Frame::Ignored => {}
        }
    }

    fn push_block(&mut self, block: BlockNode) {
        self.flush_item_inlines();
        match self.stack.last_mut() {
            None => self.root.push(block),
            Some(Frame::Quote { children }) | Some(Frame::Item { children, .. }) => {
                children.push(block)
            }
            Some(Frame::Ignored) => {}
            Some(other) => log::trace!("dropping block {block:?} inside {other:?}"),
        }
    }

    fn push_inline(&mut self, inline: InlineNode) {
        let target = match self.stack.last_mut() {
            Some(Frame::Paragraph { content })
            | Some(Frame::Heading { content, .. })
            | Some(Frame::Cell { content })
            | Some(Frame::Item { inlines: content, .. }) => content,
            Some(Frame::Styled { children, .. })
            | Some(Frame::Link { children, .. })
            | Some(Frame::Image { children, .. }) => children,
            _ => return,
        };
        // The tokenizer may split one run of text into several events.
        if let (Some(InlineNode::Text { content: last }), InlineNode::Text { content }) =
            (target.last_mut(), &inline)
        {
            last.push_str(content);
            return;
        }
        target.push(inline);
    }

    /// Wrap pending tight-item inlines in a paragraph before a block follows.
    fn flush_item_inlines(&mut self) {
        if let Some(Frame::Item { children, inlines, .. }) = self.stack.last_mut() {
            if !inlines.is_empty() {
                children.push(BlockNode::Paragraph {
                    content: std::mem::take(inlines),
                });
            }
        }
    }

    fn mark_enclosing_list_loose(&mut self) {
        let len = self.stack.len();
        if len < 2 || !matches!(self.stack[len - 1], Frame::Item { .. }) {
            return;
        }
        if let Frame::List { loose, .. } = &mut self.stack[len - 2] {
            *loose = true;
        }
    }

    fn finish(mut self) -> Vec<BlockNode> {
        while !self.stack.is_empty() {
            self.end();
        }
        self.root
    }
}

fn finish_list(
    start: Option<u64>,
    is_tight: bool,
    items: Vec<(Option<bool>, Vec<BlockNode>)>,
) -> BlockNode {
    if items.iter().any(|(checked, _)| checked.is_some()) {
        return BlockNode::TaskList {
            is_tight,
            items: items
                .into_iter()
                .map(|(checked, children)| TaskListItem::new(checked.unwrap_or(false), children))
                .collect(),
        };
    }
    let items = items.into_iter().map(|(_, children)| ListItem::new(children)).collect();
    match start {
        Some(start) => BlockNode::NumberedList { is_tight, start, items },
        None => BlockNode::BulletedList { is_tight, items },
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn alignment(alignment: pulldown_cmark::Alignment) -> Alignment {
    match alignment {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}
