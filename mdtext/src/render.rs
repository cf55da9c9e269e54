//! Inline styled-text renderer.
//!
//! Converts inline content into a flat [`StyledText`] in a single ordered
//! pass. Wrapper nodes scope their style by saving the overlay, merging their
//! role's style onto it for the children, and restoring it afterwards.

use url::Url;

use crate::markup::{RawMarkup, classify_raw_markup};
use crate::style::{Attributes, InlineTextStyles, TextStyle};
use crate::styled::StyledText;
use crate::types::{BlockNode, InlineNode};

/// Immutable inputs of a render pass.
#[derive(Debug, Default)]
pub struct RenderContext {
    /// Base for relative link destinations.
    pub base_url: Option<Url>,
    pub styles: InlineTextStyles,
    /// Overlay in effect before any inline node applies its own style.
    pub attributes: Attributes,
}

impl RenderContext {
    pub fn new(styles: InlineTextStyles) -> Self {
        Self {
            base_url: None,
            styles,
            attributes: Attributes::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Parse and set the base URL.
    pub fn with_base_url_str(self, base_url: &str) -> crate::Result<Self> {
        let url = Url::parse(base_url).map_err(|source| crate::Error::BaseUrl {
            input: base_url.to_string(),
            source,
        })?;
        Ok(self.with_base_url(url))
    }
}

impl InlineNode {
    pub fn render(&self, ctx: &RenderContext) -> StyledText {
        render_inlines(std::slice::from_ref(self), ctx)
    }
}

/// Render an inline sequence.
pub fn render_inlines(inlines: &[InlineNode], ctx: &RenderContext) -> StyledText {
    log::trace!("rendering {} inline nodes", inlines.len());
    let mut renderer = InlineRenderer::new(ctx);
    for inline in inlines {
        renderer.render(inline);
    }
    renderer.result
}

/// Render the inline content of every paragraph, heading and table cell,
/// recursing through containers, in document order.
pub fn render_blocks(blocks: &[BlockNode], ctx: &RenderContext) -> Vec<StyledText> {
    let mut out = Vec::new();
    collect_rendered(blocks, ctx, &mut out);
    log::debug!("rendered {} inline fragments from {} blocks", out.len(), blocks.len());
    out
}

fn collect_rendered(blocks: &[BlockNode], ctx: &RenderContext, out: &mut Vec<StyledText>) {
    for block in blocks {
        match block {
            BlockNode::Blockquote { children } => collect_rendered(children, ctx, out),
            BlockNode::BulletedList { items, .. } | BlockNode::NumberedList { items, .. } => {
                for item in items {
                    collect_rendered(&item.children, ctx, out);
                }
            }
            BlockNode::TaskList { items, .. } => {
                for item in items {
                    collect_rendered(&item.children, ctx, out);
                }
            }
            BlockNode::Paragraph { content } | BlockNode::Heading { content, .. } => {
                out.push(render_inlines(content, ctx));
            }
            BlockNode::Table { rows, .. } => {
                for cell in rows.iter().flat_map(|row| &row.cells) {
                    out.push(render_inlines(&cell.content, ctx));
                }
            }
            BlockNode::CodeBlock { .. }
            | BlockNode::HtmlBlock { .. }
            | BlockNode::ThematicBreak => {}
        }
    }
}

/// Traversal state of one render pass. Never shared between passes.
struct InlineRenderer<'a> {
    result: StyledText,
    base_url: Option<&'a Url>,
    styles: &'a InlineTextStyles,
    attributes: Attributes,
    skip_next_whitespace: bool,
}

impl<'a> InlineRenderer<'a> {
    fn new(ctx: &'a RenderContext) -> Self {
        Self {
            result: StyledText::new(),
            base_url: ctx.base_url.as_ref(),
            styles: &ctx.styles,
            attributes: ctx.attributes.clone(),
            skip_next_whitespace: false,
        }
    }

    fn render(&mut self, inline: &InlineNode) {
        let styles = self.styles;
        match inline {
            InlineNode::Text { content } => self.render_text(content),
            InlineNode::SoftBreak => self.render_soft_break(),
            InlineNode::LineBreak => self.render_line_break(),
            InlineNode::Code { content } => self.render_code(content),
            InlineNode::Html { content } => self.render_html(content),
            InlineNode::Emphasis { children } => {
                self.render_styled(styles.emphasis.as_ref(), children)
            }
            InlineNode::Strong { children } => {
                self.render_styled(styles.strong.as_ref(), children)
            }
            InlineNode::Strikethrough { children } => {
                self.render_styled(styles.strikethrough.as_ref(), children)
            }
            InlineNode::Link {
                destination,
                children,
            } => self.render_link(destination, children),
            // Styled text cannot carry images; neither the image nor its
            // description is emitted.
            InlineNode::Image { .. } => {}
        }
    }

    fn render_text(&mut self, text: &str) {
        let text = if self.skip_next_whitespace {
            self.skip_next_whitespace = false;
            text.trim_start()
        } else {
            text
        };
        self.result.push(text, &self.attributes);
    }

    fn render_soft_break(&mut self) {
        if self.skip_next_whitespace {
            self.skip_next_whitespace = false;
        } else {
            self.result.push(" ", &self.attributes);
        }
    }

    /// Only `<br>` markup suppresses the whitespace that follows; a hard
    /// break does not.
    fn render_line_break(&mut self) {
        self.result.push("\n", &self.attributes);
    }

    fn render_code(&mut self, code: &str) {
        let attributes = self.styles.code.merge_into(&self.attributes);
        self.result.push(code, &attributes);
    }

    fn render_html(&mut self, html: &str) {
        match classify_raw_markup(html) {
            RawMarkup::LineBreak => {
                log::trace!("treating raw markup {html:?} as a line break");
                self.render_line_break();
                self.skip_next_whitespace = true;
            }
            RawMarkup::Tag { .. } | RawMarkup::Other => self.render_text(html),
        }
    }

    fn render_styled(&mut self, style: &dyn TextStyle, children: &[InlineNode]) {
        let merged = style.merge_into(&self.attributes);
        let saved = std::mem::replace(&mut self.attributes, merged);
        for child in children {
            self.render(child);
        }
        self.attributes = saved;
    }

    fn render_link(&mut self, destination: &str, children: &[InlineNode]) {
        let mut attributes = self.styles.link.merge_into(&self.attributes);
        attributes.link = self.resolve(destination);
        let saved = std::mem::replace(&mut self.attributes, attributes);
        for child in children {
            self.render(child);
        }
        self.attributes = saved;
    }

    fn resolve(&self, destination: &str) -> Option<Url> {
        let resolved = match self.base_url {
            Some(base) => base.join(destination),
            None => Url::parse(destination),
        };
        match resolved {
            Ok(url) => Some(url),
            Err(e) => {
                log::trace!("dropping link target {destination:?}: {e}");
                None
            }
        }
    }
}
