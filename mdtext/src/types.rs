use serde::{Deserialize, Serialize};

/// A block-level Markdown construct.
///
/// Containers own their children exclusively; a tree never shares nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BlockNode {
    Blockquote {
        children: Vec<BlockNode>,
    },
    BulletedList {
        is_tight: bool,
        items: Vec<ListItem>,
    },
    NumberedList {
        is_tight: bool,
        /// First visible number of the list.
        start: u64,
        items: Vec<ListItem>,
    },
    TaskList {
        is_tight: bool,
        items: Vec<TaskListItem>,
    },
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fence_info: Option<String>,
        content: String,
    },
    HtmlBlock {
        content: String,
    },
    Paragraph {
        content: Vec<InlineNode>,
    },
    Heading {
        level: u8,
        content: Vec<InlineNode>,
    },
    Table {
        column_alignments: Vec<Alignment>,
        rows: Vec<TableRow>,
    },
    ThematicBreak,
}

/// An item of a bulleted or numbered list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub children: Vec<BlockNode>,
}

/// An item of a task list, carrying its checkbox state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListItem {
    pub is_completed: bool,
    pub children: Vec<BlockNode>,
}

/// A table row. The first row of a table is its header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    pub content: Vec<InlineNode>,
}

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// A run-level Markdown construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InlineNode {
    Text { content: String },
    SoftBreak,
    LineBreak,
    Code { content: String },
    /// Raw inline markup, kept verbatim.
    Html { content: String },
    Emphasis { children: Vec<InlineNode> },
    Strong { children: Vec<InlineNode> },
    Strikethrough { children: Vec<InlineNode> },
    Link { destination: String, children: Vec<InlineNode> },
    Image { source: String, children: Vec<InlineNode> },
}

impl BlockNode {
    pub fn paragraph(content: Vec<InlineNode>) -> Self {
        BlockNode::Paragraph { content }
    }

    pub fn heading(level: u8, content: Vec<InlineNode>) -> Self {
        BlockNode::Heading { level, content }
    }
}

impl ListItem {
    pub fn new(children: Vec<BlockNode>) -> Self {
        Self { children }
    }
}

impl TaskListItem {
    pub fn new(is_completed: bool, children: Vec<BlockNode>) -> Self {
        Self {
            is_completed,
            children,
        }
    }
}

impl TableCell {
    pub fn new(content: Vec<InlineNode>) -> Self {
        Self { content }
    }
}

impl InlineNode {
    pub fn text(content: impl Into<String>) -> Self {
        InlineNode::Text {
            content: content.into(),
        }
    }

    pub fn code(content: impl Into<String>) -> Self {
        InlineNode::Code {
            content: content.into(),
        }
    }

    pub fn html(content: impl Into<String>) -> Self {
        InlineNode::Html {
            content: content.into(),
        }
    }

    pub fn link(destination: impl Into<String>, children: Vec<InlineNode>) -> Self {
        InlineNode::Link {
            destination: destination.into(),
            children,
        }
    }

    pub fn image(source: impl Into<String>, children: Vec<InlineNode>) -> Self {
        InlineNode::Image {
            source: source.into(),
            children,
        }
    }

    /// The nested inline sequence of a wrapper node; empty for leaves.
    pub fn children(&self) -> &[InlineNode] {
        match self {
            InlineNode::Emphasis { children }
            | InlineNode::Strong { children }
            | InlineNode::Strikethrough { children }
            | InlineNode::Link { children, .. }
            | InlineNode::Image { children, .. } => children,
            InlineNode::Text { .. }
            | InlineNode::SoftBreak
            | InlineNode::LineBreak
            | InlineNode::Code { .. }
            | InlineNode::Html { .. } => &[],
        }
    }

    /// Rebuild this node around `children`. Leaves are returned unchanged.
    pub fn with_children(self, children: Vec<InlineNode>) -> Self {
        match self {
            InlineNode::Emphasis { .. } => InlineNode::Emphasis { children },
            InlineNode::Strong { .. } => InlineNode::Strong { children },
            InlineNode::Strikethrough { .. } => InlineNode::Strikethrough { children },
            InlineNode::Link { destination, .. } => InlineNode::Link {
                destination,
                children,
            },
            InlineNode::Image { source, .. } => InlineNode::Image { source, children },
            leaf => leaf,
        }
    }

    /// Split a wrapper into its shell and owned children.
    pub(crate) fn take_children(self) -> (Self, Vec<InlineNode>) {
        match self {
            InlineNode::Emphasis { children } => {
                (InlineNode::Emphasis { children: Vec::new() }, children)
            }
            InlineNode::Strong { children } => {
                (InlineNode::Strong { children: Vec::new() }, children)
            }
            InlineNode::Strikethrough { children } => {
                (InlineNode::Strikethrough { children: Vec::new() }, children)
            }
            InlineNode::Link {
                destination,
                children,
            } => (
                InlineNode::Link {
                    destination,
                    children: Vec::new(),
                },
                children,
            ),
            InlineNode::Image { source, children } => (
                InlineNode::Image {
                    source,
                    children: Vec::new(),
                },
                children,
            ),
            leaf => (leaf, Vec::new()),
        }
    }
}
