// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::path::PathBuf;

use mail_send::mail_builder::headers::address::Address;
use mail_send::mail_builder::MessageBuilder;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::modules::context::executors::MAIL_CONTEXT;
use crate::modules::envelope::extractor::extract_message_record;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailMirrorResult;
use crate::modules::mailbox::MailboxSession;
use crate::modules::cache::store::MIRROR_STORE;
use crate::{encode_mailbox_name, raise_error, validate_email};

/// Unsent message content as supplied by the caller. Attachments are local
/// files read at composition time.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DraftMessage {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<PathBuf>,
    /// UID of the draft this one replaces, removed once the new draft lands.
    pub previous_uid: Option<u32>,
}

impl DraftMessage {
    pub fn validate(&self) -> MailMirrorResult<()> {
        validate_email!(&self.from)?;
        for recipient in self.to.iter().chain(&self.cc).chain(&self.bcc) {
            validate_email!(recipient)?;
        }
        Ok(())
    }
}

fn address_list(addresses: &[String]) -> Address<'static> {
    Address::new_list(
        addresses
            .iter()
            .map(|address| Address::from(address.clone()))
            .collect(),
    )
}

impl MailboxSession {
    /// Composes a draft and appends it to the drafts folder.
    ///
    /// The new UID is the folder's UIDNEXT read just before the append; the
    /// single pooled connection per account keeps that read-then-append pair
    /// from interleaving with other local operations. The appended message
    /// is refetched to mirror it, and a superseded draft is deleted with an
    /// immediate expunge. Returns the new UID.
    pub async fn create_draft(&self, draft: &DraftMessage) -> MailMirrorResult<u32> {
        draft.validate()?;
        let account = &self.account;
        let drafts = self.drafts_folder().await?;
        let encoded = encode_mailbox_name!(&drafts);
        let executor = MAIL_CONTEXT.imap(account).await?;
        let uid = executor.uid_next(&encoded).await?;

        let mut builder = MessageBuilder::new()
            .from(Address::new_address(
                None::<&str>,
                Cow::Owned(draft.from.clone()),
            ))
            .subject(draft.subject.clone())
            .html_body(draft.html_body.clone());
        if !draft.to.is_empty() {
            builder = builder.to(address_list(&draft.to));
        }
        if !draft.cc.is_empty() {
            builder = builder.cc(address_list(&draft.cc));
        }
        if !draft.bcc.is_empty() {
            builder = builder.bcc(address_list(&draft.bcc));
        }
        for path in &draft.attachments {
            let content = tokio::fs::read(path).await.map_err(|e| {
                raise_error!(
                    format!("Failed to read attachment {}: {:#?}", path.display(), e),
                    ErrorCode::InvalidParameter
                )
            })?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("attachment")
                .to_string();
            let mime_type = mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string();
            builder = builder.attachment(mime_type, file_name, content);
        }
        let content = builder.write_to_vec().map_err(|e| {
            raise_error!(
                format!("Failed to build draft message: {}", e),
                ErrorCode::InternalError
            )
        })?;
        executor.append(&encoded, None, None, &content).await?;

        // Mirror the appended draft. Cache trouble here never unwinds the
        // append.
        match executor.uid_fetch_for_mirror(uid, &encoded).await {
            Ok(Some(fetch)) => match extract_message_record(&fetch) {
                Ok(record) => {
                    if let Err(e) = MIRROR_STORE
                        .write_message(account.user_id, &account.email, &drafts, &record)
                        .await
                    {
                        warn!("Failed to mirror draft {}: {:#?}", uid, e);
                    }
                }
                Err(e) => warn!("Failed to extract draft {}: {:#?}", uid, e),
            },
            Ok(None) => warn!("Appended draft {} not found on refetch", uid),
            Err(e) => warn!("Failed to refetch draft {}: {:#?}", uid, e),
        }

        if let Some(previous_uid) = draft.previous_uid {
            self.delete_message(&drafts, previous_uid, true).await?;
        }
        Ok(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_recipient() {
        let draft = DraftMessage {
            from: "alice@example.com".to_string(),
            to: vec!["bob@example.com".to_string(), "not-an-address".to_string()],
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_recipientless_draft() {
        let draft = DraftMessage {
            from: "alice@example.com".to_string(),
            subject: "unfinished".to_string(),
            html_body: "<p>…</p>".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
    }
}
