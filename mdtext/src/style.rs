//! Attribute overlays and the style lookup table.
//!
//! The renderer never decides what a style looks like. It only asks each
//! role's [`TextStyle`] to merge its effect onto the current overlay.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// The set of style effects applied to an emitted text run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub monospace: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    /// Resolved link target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Url>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Named terminal-safe colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// A style's only capability: merge its effect onto an overlay.
///
/// Implementations must return a new overlay and leave the input untouched.
pub trait TextStyle: Send + Sync {
    fn merge_into(&self, attributes: &Attributes) -> Attributes;
}

/// Declarative style: every `Some` field overrides the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub monospace: Option<bool>,
    pub strikethrough: Option<bool>,
    pub underline: Option<bool>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl Style {
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: Some(true),
            ..Self::default()
        }
    }

    pub fn monospace() -> Self {
        Self {
            monospace: Some(true),
            ..Self::default()
        }
    }

    pub fn strikethrough() -> Self {
        Self {
            strikethrough: Some(true),
            ..Self::default()
        }
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = Some(true);
        self
    }
}

impl TextStyle for Style {
    fn merge_into(&self, attributes: &Attributes) -> Attributes {
        let mut merged = attributes.clone();
        if let Some(bold) = self.bold {
            merged.bold = bold;
        }
        if let Some(italic) = self.italic {
            merged.italic = italic;
        }
        if let Some(monospace) = self.monospace {
            merged.monospace = monospace;
        }
        if let Some(strikethrough) = self.strikethrough {
            merged.strikethrough = strikethrough;
        }
        if let Some(underline) = self.underline {
            merged.underline = underline;
        }
        if self.foreground.is_some() {
            merged.foreground = self.foreground;
        }
        if self.background.is_some() {
            merged.background = self.background;
        }
        merged
    }
}

/// A style backed by a closure.
pub struct StyleFn<F>(pub F);

impl<F> TextStyle for StyleFn<F>
where
    F: Fn(&Attributes) -> Attributes + Send + Sync,
{
    fn merge_into(&self, attributes: &Attributes) -> Attributes {
        (self.0)(attributes)
    }
}

/// Style lookup table for the five inline roles.
pub struct InlineTextStyles {
    pub code: Box<dyn TextStyle>,
    pub emphasis: Box<dyn TextStyle>,
    pub strong: Box<dyn TextStyle>,
    pub strikethrough: Box<dyn TextStyle>,
    pub link: Box<dyn TextStyle>,
}

impl InlineTextStyles {
    /// Build a table from a style sheet; missing roles keep their defaults.
    pub fn from_sheet(sheet: StyleSheet) -> Self {
        let defaults = StyleSheet::default_styles();
        Self {
            code: Box::new(sheet.code.unwrap_or(defaults.code)),
            emphasis: Box::new(sheet.emphasis.unwrap_or(defaults.emphasis)),
            strong: Box::new(sheet.strong.unwrap_or(defaults.strong)),
            strikethrough: Box::new(sheet.strikethrough.unwrap_or(defaults.strikethrough)),
            link: Box::new(sheet.link.unwrap_or(defaults.link)),
        }
    }
}

impl Default for InlineTextStyles {
    fn default() -> Self {
        Self::from_sheet(StyleSheet::default())
    }
}

impl fmt::Debug for InlineTextStyles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineTextStyles").finish_non_exhaustive()
    }
}

/// Serializable per-role style overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strong: Option<Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Style>,
}

struct DefaultStyles {
    code: Style,
    emphasis: Style,
    strong: Style,
    strikethrough: Style,
    link: Style,
}

impl StyleSheet {
    fn default_styles() -> DefaultStyles {
        DefaultStyles {
            code: Style::monospace(),
            emphasis: Style::italic(),
            strong: Style::bold(),
            strikethrough: Style::strikethrough(),
            link: Style::default().foreground(Color::Blue).underline(),
        }
    }

    /// Parse a style sheet from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_does_not_touch_input() {
        let base = Attributes {
            foreground: Some(Color::Red),
            ..Attributes::default()
        };
        let merged = Style::bold().merge_into(&base);
        assert!(merged.bold);
        assert_eq!(merged.foreground, Some(Color::Red));
        assert!(!base.bold);
    }

    #[test]
    fn some_fields_override() {
        let base = Attributes {
            bold: true,
            foreground: Some(Color::Red),
            ..Attributes::default()
        };
        let style = Style {
            bold: Some(false),
            foreground: Some(Color::Green),
            ..Style::default()
        };
        let merged = style.merge_into(&base);
        assert!(!merged.bold);
        assert_eq!(merged.foreground, Some(Color::Green));
    }

    #[test]
    fn closure_styles() {
        let style = StyleFn(|attrs: &Attributes| Attributes {
            background: Some(Color::Yellow),
            ..attrs.clone()
        });
        assert_eq!(style.merge_into(&Attributes::default()).background, Some(Color::Yellow));
    }

    #[test]
    fn sheet_falls_back_to_defaults() {
        let sheet =
            StyleSheet::from_json(r#"{ "strong": { "foreground": "brightRed" } }"#).unwrap();
        let styles = InlineTextStyles::from_sheet(sheet);
        let strong = styles.strong.merge_into(&Attributes::default());
        assert_eq!(strong.foreground, Some(Color::BrightRed));
        assert!(!strong.bold);

        let emphasis = styles.emphasis.merge_into(&Attributes::default());
        assert!(emphasis.italic);
        let link = styles.link.merge_into(&Attributes::default());
        assert!(link.underline);
        assert_eq!(link.foreground, Some(Color::Blue));
    }

    #[test]
    fn invalid_sheet_is_an_error() {
        assert!(StyleSheet::from_json(r#"{ "code": { "foreground": "mauve" } }"#).is_err());
    }
}
