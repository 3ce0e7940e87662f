// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// Flag state of a cached message. `user` is set when the message carries
/// any server-defined keyword beyond the standard system flags.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct FlagsRecord {
    pub answered: bool,
    pub deleted: bool,
    pub draft: bool,
    pub flagged: bool,
    pub recent: bool,
    pub seen: bool,
    pub user: bool,
}

/// One attachment reference inside a message document. `path` is the
/// dot-separated content path that locates the part in the MIME tree.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRecord {
    pub path: String,
    pub file_name: String,
}

/// The durable per-message document, written to
/// `{folder}/{uid}/message.json`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub attachments: Vec<AttachmentRecord>,
    pub bcc: String,
    pub body: String,
    pub body_preview: String,
    pub cc: String,
    pub date: String,
    pub flags: FlagsRecord,
    pub from: String,
    pub html: bool,
    pub message_number: u32,
    pub subject: String,
    pub to: String,
    pub uid: u32,
}

/// The durable per-folder document, written to `{folder}/folder.json`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    pub full_name: String,
    pub name: String,
    pub message_count: u32,
    pub initialized: bool,
    pub last_updated: String,
}

/// Advisory lock document written next to `account.json`. `date_locked`
/// uses the compact `yyyyMMddHHmmss` local timestamp.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    pub locked: bool,
    pub date_locked: String,
}

/// Outcome document returned by fire-and-forget operations.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct OperationStatus {
    pub success: bool,
}

impl OperationStatus {
    pub fn success() -> Self {
        OperationStatus { success: true }
    }
}
