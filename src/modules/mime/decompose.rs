// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use mail_parser::{Message, MessagePart, MimeHeaders, PartType};

use crate::modules::cache::record::AttachmentRecord;
use crate::modules::mime::path::ContentPath;
use crate::modules::mime::sanitize::strip_unsafe_css;

pub const TEXT_SEPARATOR: &str = "\n\n";
pub const HTML_SEPARATOR: &str = "<hr />";

/// Flattened view of one message: all inline text merged into a single body,
/// every named part listed with the content path that locates it.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Decomposition {
    pub body: String,
    pub attachments: Vec<AttachmentRecord>,
}

/// Walks the parsed part tree and merges it into a `Decomposition`.
///
/// - Multipart nodes recurse into children, extending the path per child
///   index. `multipart/alternative` is the exception: the first HTML child
///   wins, its siblings are discarded, and it restarts at the root path.
/// - A named non-multipart node becomes an attachment at `path.-1`.
/// - Unnamed `text/plain` and `text/html` merge into the body, separated by a
///   blank line or an `<hr />` respectively once the body is non-empty.
/// - Nested `message/rfc822` parts stay unexpanded.
pub fn decompose(message: &Message<'_>) -> Decomposition {
    let mut decomposition = Decomposition::default();
    if !message.parts.is_empty() {
        walk(message, 0, ContentPath::root(), &mut decomposition);
    }
    decomposition
}

fn walk(message: &Message<'_>, index: usize, path: ContentPath, out: &mut Decomposition) {
    let Some(part) = message.parts.get(index) else {
        return;
    };
    if let PartType::Multipart(children) = &part.body {
        if is_alternative(part) {
            let html_child = children.iter().copied().find(|child| {
                message
                    .parts
                    .get(*child as usize)
                    .is_some_and(|p| matches!(p.body, PartType::Html(_)))
            });
            if let Some(html_index) = html_child {
                walk(message, html_index as usize, ContentPath::root(), out);
            }
            return;
        }
        for (position, child) in children.iter().copied().enumerate() {
            walk(message, child as usize, path.child(position as i32), out);
        }
        return;
    }
    if let Some(file_name) = part.attachment_name() {
        out.attachments.push(AttachmentRecord {
            path: path.attachment().to_string(),
            file_name: file_name.to_string(),
        });
        return;
    }
    match &part.body {
        PartType::Text(_) if is_plain_text(part) => {
            if let Some(text) = part.text_contents() {
                if !out.body.is_empty() {
                    out.body.push_str(TEXT_SEPARATOR);
                }
                out.body.push_str(text);
            }
        }
        PartType::Html(_) => {
            if let Some(html) = part.text_contents() {
                if !out.body.is_empty() {
                    out.body.push_str(HTML_SEPARATOR);
                }
                out.body.push_str(&strip_unsafe_css(html));
            }
        }
        _ => {}
    }
}

/// Follows a content path down the part tree. Descent stops early when a
/// segment lands on a non-multipart node, so the `-1` leaf sentinel resolves
/// to the node reached so far. An out-of-range child index resolves to
/// nothing.
pub fn resolve_part<'a, 'b>(
    message: &'a Message<'b>,
    path: &ContentPath,
) -> Option<&'a MessagePart<'b>> {
    let mut index = 0usize;
    for segment in path.segments() {
        let part = message.parts.get(index)?;
        match &part.body {
            PartType::Multipart(children) => {
                let position = usize::try_from(*segment).ok()?;
                index = *children.get(position)? as usize;
            }
            _ => break,
        }
    }
    message.parts.get(index)
}

fn is_alternative(part: &MessagePart<'_>) -> bool {
    part.content_type().is_some_and(|ct| {
        ct.ctype().eq_ignore_ascii_case("multipart")
            && ct
                .subtype()
                .is_some_and(|st| st.eq_ignore_ascii_case("alternative"))
    })
}

fn is_plain_text(part: &MessagePart<'_>) -> bool {
    match part.content_type() {
        None => true,
        Some(ct) => {
            ct.ctype().eq_ignore_ascii_case("text")
                && ct
                    .subtype()
                    .map_or(true, |st| st.eq_ignore_ascii_case("plain"))
        }
    }
}

#[cfg(test)]
mod tests {
    use mail_parser::MessageParser;

    use super::*;

    fn parse(raw: &str) -> Message<'_> {
        MessageParser::new().parse(raw.as_bytes()).unwrap()
    }

    const ALTERNATIVE: &str = "From: a@example.com\r\n\
        To: b@example.com\r\n\
        Subject: Alt\r\n\
        MIME-Version: 1.0\r\n\
        Content-Type: multipart/alternative; boundary=\"b1\"\r\n\
        \r\n\
        --b1\r\n\
        Content-Type: text/plain; charset=utf-8\r\n\
        \r\n\
        plain version\r\n\
        --b1\r\n\
        Content-Type: text/html; charset=utf-8\r\n\
        \r\n\
        <style>p{margin:0}</style><p>html version</p>\r\n\
        --b1--\r\n";

    const MIXED_WITH_ATTACHMENT: &str = "From: a@example.com\r\n\
        Subject: Mixed\r\n\
        MIME-Version: 1.0\r\n\
        Content-Type: multipart/mixed; boundary=\"b1\"\r\n\
        \r\n\
        --b1\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        hello\r\n\
        --b1\r\n\
        Content-Type: application/octet-stream; name=\"data.bin\"\r\n\
        Content-Disposition: attachment; filename=\"data.bin\"\r\n\
        Content-Transfer-Encoding: base64\r\n\
        \r\n\
        aGVsbG8=\r\n\
        --b1--\r\n";

    const NESTED: &str = "From: a@example.com\r\n\
        Subject: Nested\r\n\
        MIME-Version: 1.0\r\n\
        Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
        \r\n\
        --outer\r\n\
        Content-Type: multipart/mixed; boundary=\"inner\"\r\n\
        \r\n\
        --inner\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        inner text\r\n\
        --inner\r\n\
        Content-Type: application/pdf; name=\"report.pdf\"\r\n\
        Content-Disposition: attachment; filename=\"report.pdf\"\r\n\
        Content-Transfer-Encoding: base64\r\n\
        \r\n\
        JVBERi0=\r\n\
        --inner--\r\n\
        --outer\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        outer text\r\n\
        --outer--\r\n";

    const PLAIN_THEN_HTML: &str = "From: a@example.com\r\n\
        Subject: Both\r\n\
        MIME-Version: 1.0\r\n\
        Content-Type: multipart/mixed; boundary=\"b1\"\r\n\
        \r\n\
        --b1\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        first\r\n\
        --b1\r\n\
        Content-Type: text/html\r\n\
        \r\n\
        <p>second</p>\r\n\
        --b1--\r\n";

    #[test]
    fn test_alternative_keeps_sanitized_html_only() {
        let message = parse(ALTERNATIVE);
        let decomposition = decompose(&message);
        assert_eq!(decomposition.body, "<p>html version</p>");
        assert!(decomposition.attachments.is_empty());
    }

    #[test]
    fn test_alternative_without_html_contributes_nothing() {
        let raw = "From: a@example.com\r\n\
            Subject: Alt\r\n\
            MIME-Version: 1.0\r\n\
            Content-Type: multipart/alternative; boundary=\"b1\"\r\n\
            \r\n\
            --b1\r\n\
            Content-Type: text/plain\r\n\
            \r\n\
            only plain\r\n\
            --b1--\r\n";
        let message = parse(raw);
        let decomposition = decompose(&message);
        assert_eq!(decomposition.body, "");
    }

    #[test]
    fn test_attachment_path_uses_child_index_and_leaf() {
        let message = parse(MIXED_WITH_ATTACHMENT);
        let decomposition = decompose(&message);
        assert_eq!(decomposition.body, "hello");
        assert_eq!(decomposition.attachments.len(), 1);
        assert_eq!(decomposition.attachments[0].path, ".1.-1");
        assert_eq!(decomposition.attachments[0].file_name, "data.bin");
    }

    #[test]
    fn test_nested_attachment_path_round_trips() {
        let message = parse(NESTED);
        let decomposition = decompose(&message);
        assert_eq!(decomposition.body, "inner text\n\nouter text");
        assert_eq!(decomposition.attachments.len(), 1);
        let recorded = &decomposition.attachments[0];
        assert_eq!(recorded.path, ".0.1.-1");
        let path: ContentPath = recorded.path.parse().unwrap();
        let part = resolve_part(&message, &path).unwrap();
        assert_eq!(part.attachment_name(), Some("report.pdf"));
    }

    #[test]
    fn test_inline_text_separators() {
        let message = parse(PLAIN_THEN_HTML);
        let decomposition = decompose(&message);
        assert_eq!(decomposition.body, "first<hr /><p>second</p>");
    }

    #[test]
    fn test_single_part_message() {
        let raw = "From: a@example.com\r\n\
            Subject: Simple\r\n\
            \r\n\
            just a body\r\n";
        let message = parse(raw);
        let decomposition = decompose(&message);
        assert_eq!(decomposition.body.trim_end(), "just a body");
        assert!(decomposition.attachments.is_empty());
    }

    #[test]
    fn test_forwarded_message_stays_unexpanded() {
        let raw = "From: a@example.com\r\n\
            Subject: Fwd\r\n\
            MIME-Version: 1.0\r\n\
            Content-Type: multipart/mixed; boundary=\"b1\"\r\n\
            \r\n\
            --b1\r\n\
            Content-Type: text/plain\r\n\
            \r\n\
            see below\r\n\
            --b1\r\n\
            Content-Type: message/rfc822\r\n\
            \r\n\
            From: c@example.com\r\n\
            Subject: Original\r\n\
            \r\n\
            original body\r\n\
            --b1--\r\n";
        let message = parse(raw);
        let decomposition = decompose(&message);
        assert_eq!(decomposition.body, "see below");
        assert!(decomposition.attachments.is_empty());
    }

    #[test]
    fn test_resolve_root_path() {
        let raw = "From: a@example.com\r\n\
            Subject: Simple\r\n\
            \r\n\
            body\r\n";
        let message = parse(raw);
        let part = resolve_part(&message, &ContentPath::root()).unwrap();
        assert!(matches!(part.body, PartType::Text(_)));
    }

    #[test]
    fn test_resolve_out_of_range_child() {
        let message = parse(MIXED_WITH_ATTACHMENT);
        let path: ContentPath = ".7.-1".parse().unwrap();
        assert!(resolve_part(&message, &path).is_none());
    }
}
