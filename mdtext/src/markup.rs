//! Raw inline markup sniffing.
//!
//! Only the tag name is looked at; attributes are skipped and nothing else
//! about the markup is interpreted.

/// What a piece of raw inline markup looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMarkup {
    /// A `<br>` tag in any letter case or form (`<br>`, `<br/>`, `</br>`).
    LineBreak,
    /// Any other tag.
    Tag {
        name: String,
        closing: bool,
        self_closing: bool,
    },
    /// Comments, declarations, or text that is not a tag at all.
    Other,
}

/// Classify raw inline markup.
pub fn classify_raw_markup(raw: &str) -> RawMarkup {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix('<').and_then(|s| s.strip_suffix('>')) else {
        return RawMarkup::Other;
    };

    let (closing, rest) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    let name_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
        .count();
    if name_len == 0 || !rest.as_bytes()[0].is_ascii_alphabetic() {
        return RawMarkup::Other;
    }

    let name = &rest[..name_len];
    let after_name = &rest[name_len..];
    // The name must end at whitespace, a slash, or the end of the tag.
    if !after_name.is_empty() && !after_name.starts_with(|c: char| c.is_whitespace() || c == '/') {
        return RawMarkup::Other;
    }

    if name.eq_ignore_ascii_case("br") {
        return RawMarkup::LineBreak;
    }

    RawMarkup::Tag {
        name: name.to_ascii_lowercase(),
        closing,
        self_closing: after_name.trim_end().ends_with('/'),
    }
}
