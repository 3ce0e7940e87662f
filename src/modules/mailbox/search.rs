// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::encode_mailbox_name;
use crate::modules::context::executors::MAIL_CONTEXT;
use crate::modules::error::MailMirrorResult;
use crate::modules::mailbox::MailboxSession;

fn quote_token(token: &str) -> String {
    format!("\"{}\"", token.replace('\\', "\\\\").replace('"', "\\\""))
}

/// One token's OR group over the six searched fields. IMAP OR is a binary
/// prefix operator, so the group folds up right to left.
fn token_group(token: &str) -> String {
    let quoted = quote_token(token);
    let mut command = format!("SUBJECT {}", quoted);
    for field in ["BODY", "BCC", "CC", "TO", "FROM"] {
        command = format!("OR {} {} {}", field, quoted, command);
    }
    command
}

/// Builds the UID SEARCH program for free-form query text. Tokens split on
/// whitespace; each must match at least one of from, to, cc, bcc, body, or
/// subject, independently, so the groups are joined by juxtaposition (IMAP's
/// implicit AND).
pub fn build_search_query(query_text: &str) -> String {
    query_text
        .split_whitespace()
        .map(token_group)
        .collect::<Vec<_>>()
        .join(" ")
}

impl MailboxSession {
    /// Runs the query text against a folder and returns matching UIDs in
    /// ascending order. Blank query text matches nothing.
    pub async fn search_messages(
        &self,
        folder_name: &str,
        query_text: &str,
    ) -> MailMirrorResult<Vec<u32>> {
        let query = build_search_query(query_text);
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let executor = MAIL_CONTEXT.imap(&self.account).await?;
        let uids = executor
            .uid_search(&encode_mailbox_name!(folder_name), &query)
            .await?;
        let mut uids: Vec<u32> = uids.into_iter().collect();
        uids.sort_unstable();
        Ok(uids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token_ors_all_fields() {
        assert_eq!(
            build_search_query("alice"),
            "OR FROM \"alice\" OR TO \"alice\" OR CC \"alice\" OR BCC \"alice\" \
             OR BODY \"alice\" SUBJECT \"alice\""
        );
    }

    #[test]
    fn test_tokens_and_together() {
        let query = build_search_query("alice bob");
        let groups: Vec<&str> = query.split("OR FROM").collect();
        // Two OR groups, one per token, joined by a space.
        assert_eq!(groups.len(), 3);
        assert!(query.contains("SUBJECT \"alice\" OR FROM \"bob\""));
    }

    #[test]
    fn test_quotes_and_backslashes_escape() {
        assert_eq!(quote_token("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote_token("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_blank_query_builds_nothing() {
        assert_eq!(build_search_query(""), "");
        assert_eq!(build_search_query("   "), "");
    }
}
