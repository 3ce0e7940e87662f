// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use async_imap::types::NameAttribute;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::modules::cache::store::MIRROR_STORE;
use crate::modules::context::executors::MAIL_CONTEXT;
use crate::modules::error::MailMirrorResult;
use crate::modules::mailbox::MailboxSession;
use crate::{decode_mailbox_name, encode_mailbox_name};

pub const DRAFTS_FOLDER: &str = "Drafts";

/// One message-holding folder discovered by the remote tree walk. Names are
/// carried decoded; modified UTF-7 stays at the wire.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct RemoteFolder {
    pub full_name: String,
    pub name: String,
}

pub(crate) fn leaf_name(full_name: &str, delimiter: Option<&str>) -> String {
    match delimiter {
        Some(d) if !d.is_empty() => full_name
            .rsplit(d)
            .next()
            .unwrap_or(full_name)
            .to_string(),
        _ => full_name.to_string(),
    }
}

impl MailboxSession {
    /// Walks the remote folder hierarchy and returns every folder able to
    /// hold messages.
    ///
    /// Each level is one LIST round-trip against the node's direct children;
    /// a child without `\Noselect` lands in the result, a child without
    /// `\Noinferiors` is pushed for descent. A level that fails to list is
    /// logged and its subtree skipped. Callers rely on membership, not on
    /// the exact traversal order.
    pub async fn list_folders(&self) -> MailMirrorResult<Vec<RemoteFolder>> {
        let executor = MAIL_CONTEXT.imap(&self.account).await?;
        let mut folders = Vec::new();
        let mut pending = vec!["%".to_string()];
        while let Some(pattern) = pending.pop() {
            let names = match executor.list_mailboxes(&pattern).await {
                Ok(names) => names,
                Err(e) => {
                    warn!("LIST {} failed, skipping subtree: {:#?}", pattern, e);
                    continue;
                }
            };
            // Descent patterns go on in reverse so subtrees pop in listed
            // order.
            for name in names.iter().rev() {
                let raw = name.name();
                let holds_messages = !name
                    .attributes()
                    .iter()
                    .any(|attr| matches!(attr, NameAttribute::NoSelect));
                let holds_folders = !name
                    .attributes()
                    .iter()
                    .any(|attr| matches!(attr, NameAttribute::NoInferiors));
                if holds_messages {
                    let full_name = decode_mailbox_name!(raw);
                    let name = leaf_name(&full_name, name.delimiter());
                    folders.push(RemoteFolder { full_name, name });
                }
                if holds_folders {
                    if let Some(delimiter) = name.delimiter() {
                        pending.push(format!("{}{}%", raw, delimiter));
                    }
                }
            }
        }
        Ok(folders)
    }

    /// Full name of the account's drafts folder. Resolution order: a cached
    /// folder record named "drafts", then the remote walk, then CREATE.
    pub async fn drafts_folder(&self) -> MailMirrorResult<String> {
        let cached = MIRROR_STORE
            .list_folders(self.account.user_id, &self.account.email)
            .await;
        if let Some(record) = cached
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(DRAFTS_FOLDER))
        {
            return Ok(record.full_name.clone());
        }
        let walked = self.list_folders().await?;
        if let Some(folder) = walked
            .iter()
            .find(|folder| folder.name.eq_ignore_ascii_case(DRAFTS_FOLDER))
        {
            return Ok(folder.full_name.clone());
        }
        let executor = MAIL_CONTEXT.imap(&self.account).await?;
        executor
            .create_mailbox(encode_mailbox_name!(DRAFTS_FOLDER).as_str())
            .await?;
        Ok(DRAFTS_FOLDER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_name_splits_on_delimiter() {
        assert_eq!(leaf_name("INBOX/Work/Invoices", Some("/")), "Invoices");
        assert_eq!(leaf_name("INBOX.Archive", Some(".")), "Archive");
        assert_eq!(leaf_name("INBOX", Some("/")), "INBOX");
    }

    #[test]
    fn test_leaf_name_without_delimiter() {
        assert_eq!(leaf_name("Notes", None), "Notes");
        assert_eq!(leaf_name("Notes", Some("")), "Notes");
    }
}
