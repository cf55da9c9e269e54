//! CommonMark serializer.
//!
//! Writes a (possibly rewritten) tree back out as Markdown source. Parsing the
//! output yields a structurally equal tree for everything the parser models.

use crate::types::{Alignment, BlockNode, InlineNode};

/// Render blocks as CommonMark, one blank line between blocks.
pub fn to_markdown(blocks: &[BlockNode]) -> String {
    let mut out = render_blocks(blocks, "\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn render_blocks(blocks: &[BlockNode], separator: &str) -> String {
    blocks.iter().map(render_block).collect::<Vec<_>>().join(separator)
}

fn render_block(block: &BlockNode) -> String {
    match block {
        BlockNode::Blockquote { children } => render_blocks(children, "\n\n")
            .lines()
            .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
            .collect::<Vec<_>>()
            .join("\n"),

        BlockNode::BulletedList { is_tight, items } => render_list(
            *is_tight,
            items.iter().map(|item| ("- ".to_string(), item.children.as_slice())),
        ),

        BlockNode::NumberedList {
            is_tight,
            start,
            items,
        } => render_list(
            *is_tight,
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let number = start.saturating_add(i as u64);
                    (format!("{number}. "), item.children.as_slice())
                }),
        ),

        BlockNode::TaskList { is_tight, items } => render_list(
            *is_tight,
            items.iter().map(|item| {
                let check = if item.is_completed { "x" } else { " " };
                (format!("- [{check}] "), item.children.as_slice())
            }),
        ),

        BlockNode::CodeBlock { fence_info, content } => {
            let fence = "`".repeat(longest_run(content, '`').max(2) + 1);
            let info = fence_info.as_deref().unwrap_or("");
            let newline = if content.is_empty() || content.ends_with('\n') { "" } else { "\n" };
            format!("{fence}{info}\n{content}{newline}{fence}")
        }

        BlockNode::HtmlBlock { content } => content.trim_end().to_string(),

        BlockNode::Paragraph { content } => render_inlines(content),

        BlockNode::Heading { level, content } => {
            format!("{} {}", "#".repeat((*level).clamp(1, 6) as usize), render_inlines(content))
        }

        BlockNode::Table {
            column_alignments,
            rows,
        } => {
            let Some((header, body)) = rows.split_first() else {
                return String::new();
            };
            let row_line = |cells: Vec<String>| format!("| {} |", cells.join(" | "));
            let cells = |row: &crate::types::TableRow| {
                row.cells
                    .iter()
                    .map(|cell| render_inlines(&cell.content).replace('|', "\\|"))
                    .collect::<Vec<_>>()
            };

            let mut lines = vec![row_line(cells(header))];
            let separators = (0..header.cells.len())
                .map(|i| match column_alignments.get(i).copied().unwrap_or_default() {
                    Alignment::None => "---",
                    Alignment::Left => ":--",
                    Alignment::Center => ":-:",
                    Alignment::Right => "--:",
                })
                .map(str::to_string)
                .collect();
            lines.push(row_line(separators));
            for row in body {
                lines.push(row_line(cells(row)));
            }
            lines.join("\n")
        }

        BlockNode::ThematicBreak => "---".to_string(),
    }
}

fn render_list<'a>(
    is_tight: bool,
    items: impl Iterator<Item = (String, &'a [BlockNode])>,
) -> String {
    let (block_sep, item_sep) = if is_tight { ("\n", "\n") } else { ("\n\n", "\n\n") };
    items
        .map(|(marker, children)| {
            let indent = " ".repeat(marker.len());
            let body = render_blocks(children, block_sep);
            let mut lines = body.lines();
            let mut out = format!("{marker}{}", lines.next().unwrap_or(""));
            for line in lines {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&indent);
                    out.push_str(line);
                }
            }
            out.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join(item_sep)
}

/// Render inline content as CommonMark source.
pub fn render_inlines(inlines: &[InlineNode]) -> String {
    let mut out = String::new();
    render_inlines_into(inlines, &mut out);
    out
}

fn render_inlines_into(inlines: &[InlineNode], out: &mut String) {
    for inline in inlines {
        render_inline(inline, out);
    }
}

fn render_inline(inline: &InlineNode, out: &mut String) {
    match inline {
        InlineNode::Text { content } => escape_into(content, out),
        InlineNode::SoftBreak => out.push('\n'),
        InlineNode::LineBreak => out.push_str("\\\n"),
        InlineNode::Code { content } => {
            let ticks = "`".repeat(longest_run(content, '`') + 1);
            let pad = if content.starts_with('`') || content.ends_with('`') {
                " "
            } else {
                ""
            };
            out.push_str(&format!("{ticks}{pad}{content}{pad}{ticks}"));
        }
        InlineNode::Html { content } => out.push_str(content),
        InlineNode::Emphasis { children } => wrap("*", children, out),
        InlineNode::Strong { children } => wrap("**", children, out),
        InlineNode::Strikethrough { children } => wrap("~~", children, out),
        InlineNode::Link {
            destination,
            children,
        } => {
            out.push('[');
            render_inlines_into(children, out);
            out.push_str(&format!("]({})", format_destination(destination)));
        }
        InlineNode::Image { source, children } => {
            out.push_str("![");
            render_inlines_into(children, out);
            out.push_str(&format!("]({})", format_destination(source)));
        }
    }
}

fn wrap(marker: &str, children: &[InlineNode], out: &mut String) {
    out.push_str(marker);
    render_inlines_into(children, out);
    out.push_str(marker);
}

fn format_destination(destination: &str) -> String {
    let needs_brackets = destination.is_empty()
        || destination.contains(|c: char| c.is_whitespace() || c == '(' || c == ')');
    if needs_brackets {
        format!("<{destination}>")
    } else {
        destination.to_string()
    }
}

fn escape_into(text: &str, out: &mut String) {
    let marker = if out.is_empty() || out.ends_with('\n') {
        block_marker(text)
    } else {
        None
    };
    for (i, c) in text.char_indices() {
        let punctuation = matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '~' | '&');
        if punctuation || marker == Some(i) {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Byte offset of the character that would open a block (heading, quote,
/// list item, setext underline) if `text` started a line.
fn block_marker(text: &str) -> Option<usize> {
    let indent = text.len() - text.trim_start_matches([' ', '\t']).len();
    let rest = &text[indent..];
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    match rest.as_bytes().get(digits)? {
        b'.' | b')' if (1..=9).contains(&digits) => Some(indent + digits),
        b'#' | b'>' | b'-' | b'+' | b'=' if digits == 0 => Some(indent),
        _ => None,
    }
}

fn longest_run(text: &str, target: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == target {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
