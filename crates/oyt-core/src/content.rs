//! Conversions between the plain text sent for translation and the markup
//! some page inputs hold.

use std::sync::LazyLock;

use oyt_config::ContentKind;
use regex::Regex;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Escape `text` and turn every line break into `<br>`
pub fn text_to_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "<br>")
}

/// `<br>` becomes a line break, other tags are dropped, entities decoded
pub fn markup_to_text(markup: &str) -> String {
    let text = LINE_BREAK.replace_all(markup, "\n");
    let text = TAG.replace_all(&text, "");
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Plain text of a value read as `kind`
pub fn to_text(value: String, kind: ContentKind) -> String {
    match kind {
        ContentKind::Text => value,
        ContentKind::Markup => markup_to_text(&value),
    }
}

/// Plain text encoded for an element of `kind`
pub fn from_text(text: &str, kind: ContentKind) -> String {
    match kind {
        ContentKind::Text => text.to_string(),
        ContentKind::Markup => text_to_markup(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_and_text_agree_on_line_breaks() {
        assert_eq!(text_to_markup("a\nb"), "a<br>b");
        assert_eq!(markup_to_text("a<br>b<BR/>c<br />d"), "a\nb\nc\nd");
    }

    #[test]
    fn special_characters_survive_a_trip_through_markup() {
        let text = "Fish & chips <3\nsecond line";
        assert_eq!(markup_to_text(&text_to_markup(text)), text);
    }

    #[test]
    fn stray_tags_are_removed() {
        assert_eq!(markup_to_text("<div>hello</div>&nbsp;world"), "hello world");
    }
}
