// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use mail_parser::{MessageParser, MimeHeaders};
use serde::{Deserialize, Serialize};

use crate::encode_mailbox_name;
use crate::modules::context::executors::MAIL_CONTEXT;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailMirrorResult;
use crate::modules::mailbox::MailboxSession;
use crate::modules::mime::decompose::resolve_part;
use crate::modules::mime::path::ContentPath;
use crate::raise_error;

const OCTET_STREAM: &str = "application/octet-stream";

/// Decoded attachment bytes with their presentation metadata.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct AttachmentContent {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MailboxSession {
    /// Retrieves one attachment from the live message by the content path
    /// its mirror record carries.
    pub async fn get_attachment(
        &self,
        folder_name: &str,
        uid: u32,
        content_path: &str,
    ) -> MailMirrorResult<AttachmentContent> {
        let executor = MAIL_CONTEXT.imap(&self.account).await?;
        let encoded = encode_mailbox_name!(folder_name);
        let fetch = executor
            .uid_fetch_full_message(uid, &encoded)
            .await?
            .ok_or_else(|| {
                raise_error!(
                    format!("Message {} not found in {}", uid, folder_name),
                    ErrorCode::ResourceNotFound
                )
            })?;
        let raw = fetch.body().ok_or_else(|| {
            raise_error!(
                format!("Message {} has no content", uid),
                ErrorCode::ImapUnexpectedResult
            )
        })?;
        let message = MessageParser::new().parse(raw).ok_or_else(|| {
            raise_error!(
                format!("Message {} could not be parsed", uid),
                ErrorCode::MessageParseFailed
            )
        })?;
        let path: ContentPath = content_path.parse()?;
        let part = resolve_part(&message, &path).ok_or_else(|| {
            raise_error!(
                format!("No part at {} in message {}", content_path, uid),
                ErrorCode::ResourceNotFound
            )
        })?;
        let content_type = part
            .content_type()
            .map(|content_type| match content_type.subtype() {
                Some(subtype) => format!("{}/{}", content_type.ctype(), subtype),
                None => content_type.ctype().to_string(),
            })
            .unwrap_or_else(|| OCTET_STREAM.to_string());
        let file_name = part
            .attachment_name()
            .unwrap_or("attachment")
            .to_string();
        Ok(AttachmentContent {
            file_name,
            content_type,
            data: part.contents().to_vec(),
        })
    }
}
