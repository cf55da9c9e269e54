//! ANSI terminal output.
//!
//! Turns styled text into escape sequences with the `colored` crate and gives
//! each block kind a simple visual treatment suitable for CLI display.

use colored::{ColoredString, Colorize};

use crate::render::{RenderContext, render_inlines};
use crate::style::{Attributes, Color};
use crate::styled::StyledText;
use crate::types::BlockNode;

/// Render styled text as ANSI escape sequences.
///
/// Link targets are printed after the linked text, since most terminals
/// cannot attach them to characters.
pub fn styled_to_ansi(text: &StyledText) -> String {
    let mut out = String::new();
    let runs = text.runs();
    for (i, run) in runs.iter().enumerate() {
        out.push_str(&paint(&run.text, &run.attributes).to_string());
        if let Some(link) = &run.attributes.link {
            let next_link = runs.get(i + 1).and_then(|next| next.attributes.link.as_ref());
            if next_link != Some(link) {
                out.push_str(&format!(" {}", format!("<{link}>").dimmed()));
            }
        }
    }
    out
}

fn paint(text: &str, attributes: &Attributes) -> ColoredString {
    // Terminals are monospaced already, so `monospace` has no effect here.
    let mut s = text.normal();
    if attributes.bold {
        s = s.bold();
    }
    if attributes.italic {
        s = s.italic();
    }
    if attributes.strikethrough {
        s = s.strikethrough();
    }
    if attributes.underline {
        s = s.underline();
    }
    if let Some(color) = attributes.foreground {
        s = s.color(term_color(color));
    }
    if let Some(color) = attributes.background {
        s = s.on_color(term_color(color));
    }
    s
}

fn term_color(color: Color) -> colored::Color {
    match color {
        Color::Black => colored::Color::Black,
        Color::Red => colored::Color::Red,
        Color::Green => colored::Color::Green,
        Color::Yellow => colored::Color::Yellow,
        Color::Blue => colored::Color::Blue,
        Color::Magenta => colored::Color::Magenta,
        Color::Cyan => colored::Color::Cyan,
        Color::White => colored::Color::White,
        Color::BrightBlack => colored::Color::BrightBlack,
        Color::BrightRed => colored::Color::BrightRed,
        Color::BrightGreen => colored::Color::BrightGreen,
        Color::BrightYellow => colored::Color::BrightYellow,
        Color::BrightBlue => colored::Color::BrightBlue,
        Color::BrightMagenta => colored::Color::BrightMagenta,
        Color::BrightCyan => colored::Color::BrightCyan,
        Color::BrightWhite => colored::Color::BrightWhite,
    }
}

/// Render a block sequence as ANSI-colored terminal text.
pub fn to_terminal(blocks: &[BlockNode], ctx: &RenderContext) -> String {
    blocks
        .iter()
        .map(|block| render_block(block, ctx))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(block: &BlockNode, ctx: &RenderContext) -> String {
    match block {
        BlockNode::Paragraph { content } => styled_to_ansi(&render_inlines(content, ctx)),

        BlockNode::Heading { level, content } => {
            let marker = "#".repeat(*level as usize);
            let text = styled_to_ansi(&render_inlines(content, ctx));
            format!("{} {}", marker.bold().cyan(), text.bold())
        }

        BlockNode::Blockquote { children } => {
            let border = format!("{}", "\u{2502}".cyan()); // │
            to_terminal(children, ctx)
                .lines()
                .map(|line| format!("{border} {line}"))
                .collect::<Vec<_>>()
                .join("\n")
        }

        BlockNode::BulletedList { is_tight, items } => list(
            *is_tight,
            items
                .iter()
                .map(|item| ("\u{2022}".to_string(), to_terminal(&item.children, ctx))), // •
        ),

        BlockNode::NumberedList {
            is_tight,
            start,
            items,
        } => list(
            *is_tight,
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let number = start.saturating_add(i as u64);
                    (format!("{number}."), to_terminal(&item.children, ctx))
                }),
        ),

        BlockNode::TaskList { is_tight, items } => list(
            *is_tight,
            items.iter().map(|item| {
                let check = if item.is_completed {
                    format!("{}", "\u{2713}".green()) // ✓
                } else {
                    "\u{2610}".to_string() // ☐
                };
                (check, to_terminal(&item.children, ctx))
            }),
        ),

        BlockNode::CodeBlock { fence_info, content } => {
            let label = match fence_info {
                Some(info) => format!(" {}", info.dimmed()),
                None => String::new(),
            };
            let border = format!("{}", "\u{2500}\u{2500}\u{2500}".dimmed()); // ───
            let mut lines = vec![format!("{border}{label}")];
            for line in content.lines() {
                lines.push(format!("  {line}"));
            }
            lines.push(border);
            lines.join("\n")
        }

        BlockNode::HtmlBlock { content } => format!("{}", content.trim_end().dimmed()),

        BlockNode::Table { rows, .. } => table(rows, ctx),

        BlockNode::ThematicBreak => format!("{}", "\u{2500}".repeat(40).dimmed()),
    }
}

fn list(is_tight: bool, items: impl Iterator<Item = (String, String)>) -> String {
    let separator = if is_tight { "\n" } else { "\n\n" };
    items
        .map(|(marker, body)| {
            let mut lines = body.lines();
            let mut out = format!("{marker} {}", lines.next().unwrap_or(""));
            for line in lines {
                out.push_str(&format!("\n  {line}"));
            }
            out
        })
        .collect::<Vec<_>>()
        .join(separator)
}

fn table(rows: &[crate::types::TableRow], ctx: &RenderContext) -> String {
    let rendered: Vec<Vec<StyledText>> = rows
        .iter()
        .map(|row| row.cells.iter().map(|cell| render_inlines(&cell.content, ctx)).collect())
        .collect();

    // Calculate column widths from the visible characters
    let columns = rendered.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.plain().chars().count());
        }
    }

    let separator: String = widths
        .iter()
        .map(|&w| "\u{2500}".repeat(w + 2)) // ─
        .collect::<Vec<_>>()
        .join("\u{253C}"); // ┼

    let mut lines = Vec::new();
    for (r, row) in rendered.iter().enumerate() {
        let cells: Vec<String> = (0..columns)
            .map(|i| {
                let (ansi, visible) = match row.get(i) {
                    Some(cell) => (styled_to_ansi(cell), cell.plain().chars().count()),
                    None => (String::new(), 0),
                };
                let pad = " ".repeat(widths[i] - visible);
                if r == 0 {
                    format!(" {}{pad} ", ansi.bold())
                } else {
                    format!(" {ansi}{pad} ")
                }
            })
            .collect();
        lines.push(format!("\u{2502}{}\u{2502}", cells.join("\u{2502}")));
        if r == 0 {
            lines.push(format!("\u{2502}{separator}\u{2502}"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InlineNode, ListItem};

    #[test]
    fn plain_runs_survive_without_colors() {
        colored::control::set_override(false);
        let mut text = StyledText::new();
        text.push("hello", &Attributes::default());
        text.push(
            " bold",
            &Attributes {
                bold: true,
                ..Attributes::default()
            },
        );
        assert_eq!(styled_to_ansi(&text), "hello bold");
    }

    #[test]
    fn link_target_follows_linked_text() {
        colored::control::set_override(false);
        let ctx = RenderContext::default().with_base_url_str("https://x.test/").unwrap();
        let out = to_terminal(
            &[BlockNode::paragraph(vec![
                InlineNode::link("/a", vec![InlineNode::text("a "), InlineNode::Strong {
                    children: vec![InlineNode::text("b")],
                }]),
                InlineNode::text(" after"),
            ])],
            &ctx,
        );
        assert_eq!(out, "a b <https://x.test/a> after");
    }

    #[test]
    fn tight_list_and_table_layout() {
        colored::control::set_override(false);
        let blocks = crate::parse::parse("- one\n- two\n\n| a | bb |\n|---|---|\n| ccc | d |\n");
        let out = to_terminal(&blocks, &RenderContext::default());
        let expected = [
            "• one",
            "• two",
            "",
            "│ a   │ bb │",
            "│─────┼────│",
            "│ ccc │ d  │",
        ];
        assert_eq!(out, expected.join("\n"));
    }

    #[test]
    fn numbered_list_at_largest_start_does_not_overflow() {
        colored::control::set_override(false);
        let item = |s: &str| ListItem::new(vec![BlockNode::paragraph(vec![InlineNode::text(s)])]);
        let blocks = [BlockNode::NumberedList {
            is_tight: true,
            start: u64::MAX,
            items: vec![item("a"), item("b")],
        }];
        let max = u64::MAX;
        assert_eq!(
            to_terminal(&blocks, &RenderContext::default()),
            format!("{max}. a\n{max}. b")
        );
    }
}
