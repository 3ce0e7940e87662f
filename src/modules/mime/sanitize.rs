// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::LazyLock;

use regex::Regex;

static LINK_ELEMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<link [^>]+>").unwrap());
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<style.*?</style>").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]+").unwrap());

pub const PREVIEW_LENGTH: usize = 150;

/// Removes stylesheet links and style blocks before HTML content is merged
/// into a cached body. Tags are matched case-sensitively; script elements and
/// inline event handlers pass through untouched.
pub fn strip_unsafe_css(html: &str) -> String {
    let without_links = LINK_ELEMENT.replace_all(html, "");
    STYLE_BLOCK.replace_all(&without_links, "").into_owned()
}

/// Derives the short plain-text preview of a merged body: tags and line
/// breaks removed, then a plain character cut at the preview length.
pub fn preview(body: &str) -> String {
    let without_tags = HTML_TAG.replace_all(body, "");
    let flattened = LINE_BREAKS.replace_all(&without_tags, "");
    flattened.chars().take(PREVIEW_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_style_block() {
        assert_eq!(
            strip_unsafe_css("<style>body{color:red}</style><p>hi</p>"),
            "<p>hi</p>"
        );
    }

    #[test]
    fn test_strip_style_block_spanning_lines() {
        let html = "<style type=\"text/css\">\nbody { margin: 0; }\n</style><div>kept</div>";
        assert_eq!(strip_unsafe_css(html), "<div>kept</div>");
    }

    #[test]
    fn test_strip_link_element() {
        let html = "<link rel=\"stylesheet\" href=\"a.css\"><p>hi</p>";
        assert_eq!(strip_unsafe_css(html), "<p>hi</p>");
    }

    #[test]
    fn test_uppercase_tags_pass_through() {
        let html = "<STYLE>x</STYLE><p>hi</p>";
        assert_eq!(strip_unsafe_css(html), html);
    }

    #[test]
    fn test_script_passes_through() {
        let html = "<script>alert(1)</script><p>hi</p>";
        assert_eq!(strip_unsafe_css(html), html);
    }

    #[test]
    fn test_preview_strips_tags_and_breaks() {
        assert_eq!(
            preview("<p>hello</p>\r\n<b>world</b>\n"),
            "helloworld"
        );
    }

    #[test]
    fn test_preview_cuts_at_length() {
        let long = "x".repeat(400);
        assert_eq!(preview(&long).len(), PREVIEW_LENGTH);
    }

    #[test]
    fn test_preview_cut_is_character_based() {
        let body = "é".repeat(200);
        let cut = preview(&body);
        assert_eq!(cut.chars().count(), PREVIEW_LENGTH);
    }
}
