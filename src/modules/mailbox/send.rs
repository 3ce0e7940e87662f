// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use mail_parser::MessageParser;
use mail_send::smtp::message::Message;
use tracing::error;

use crate::encode_mailbox_name;
use crate::modules::cache::record::OperationStatus;
use crate::modules::common::AddrVec;
use crate::modules::context::executors::MAIL_CONTEXT;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::{MailMirrorError, MailMirrorResult};
use crate::modules::mailbox::MailboxSession;
use crate::raise_error;

impl MailboxSession {
    /// Loads a draft by UID and transmits it to every recipient on the
    /// message. The draft is deleted (with expunge) only once the transport
    /// accepts the message; a refused transmission is logged and leaves the
    /// draft in place for a retry. Transport checkout failures propagate.
    pub async fn send_message(&self, draft_uid: u32) -> MailMirrorResult<OperationStatus> {
        let account = &self.account;
        let drafts = self.drafts_folder().await?;
        let encoded = encode_mailbox_name!(&drafts);
        let executor = MAIL_CONTEXT.imap(account).await?;
        let fetch = executor
            .uid_fetch_full_message(draft_uid, &encoded)
            .await?
            .ok_or_else(|| {
                raise_error!(
                    format!("Draft {} not found in {}", draft_uid, drafts),
                    ErrorCode::ResourceNotFound
                )
            })?;
        let raw = fetch.body().ok_or_else(|| {
            raise_error!(
                format!("Draft {} has no content", draft_uid),
                ErrorCode::ImapUnexpectedResult
            )
        })?;
        let parsed = MessageParser::new().parse(raw).ok_or_else(|| {
            raise_error!(
                format!("Draft {} could not be parsed", draft_uid),
                ErrorCode::MessageParseFailed
            )
        })?;

        let from = parsed
            .from()
            .and_then(|address| AddrVec::from(address).first().cloned())
            .and_then(|address| address.address)
            .unwrap_or_else(|| account.email.clone());
        let mut recipients: Vec<String> = Vec::new();
        for list in [parsed.to(), parsed.cc(), parsed.bcc()].into_iter().flatten() {
            recipients.extend(
                AddrVec::from(list)
                    .iter()
                    .filter_map(|address| address.address.clone()),
            );
        }
        if recipients.is_empty() {
            return Err(raise_error!(
                format!("Draft {} has no recipients", draft_uid),
                ErrorCode::InvalidParameter
            ));
        }

        let mut message = Message::empty().from(from).body(raw.to_vec());
        for recipient in recipients {
            message = message.to(recipient);
        }

        let sender = MAIL_CONTEXT.smtp(account).await?;
        match sender.send_email(message).await {
            Ok(()) => {
                self.delete_message(&drafts, draft_uid, true).await?;
                Ok(OperationStatus::success())
            }
            Err(MailMirrorError::Generic {
                message,
                code: ErrorCode::SmtpCommandFailed,
                ..
            }) => {
                error!(
                    "Failed to transmit draft {} of {}: {}",
                    draft_uid, account.email, message
                );
                Ok(OperationStatus { success: false })
            }
            Err(e) => Err(e),
        }
    }
}
