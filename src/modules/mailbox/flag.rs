// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::encode_mailbox_name;
use crate::modules::cache::record::OperationStatus;
use crate::modules::cache::store::MIRROR_STORE;
use crate::modules::context::executors::MAIL_CONTEXT;
use crate::modules::error::MailMirrorResult;
use crate::modules::mailbox::MailboxSession;

/// Flags a caller may toggle. The closed set makes an unknown flag name a
/// request parse failure instead of a silent no-op.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum MessageFlag {
    Answered,
    Flagged,
    Seen,
}

impl MessageFlag {
    pub fn to_imap_string(&self) -> &'static str {
        match self {
            MessageFlag::Answered => "\\Answered",
            MessageFlag::Flagged => "\\Flagged",
            MessageFlag::Seen => "\\Seen",
        }
    }
}

impl MailboxSession {
    /// Sets or clears one flag on a batch of messages. The remote store is
    /// written first and is authoritative; the cached record is then patched
    /// in place. A UID that fails is logged and the batch keeps going.
    pub async fn flag_messages(
        &self,
        folder_name: &str,
        uids: &[u32],
        flag: MessageFlag,
        value: bool,
    ) -> MailMirrorResult<OperationStatus> {
        let account = &self.account;
        let executor = MAIL_CONTEXT.imap(account).await?;
        let encoded = encode_mailbox_name!(folder_name);
        for &uid in uids {
            let uid_set = uid.to_string();
            let stored = if value {
                executor
                    .uid_add_flags(&uid_set, &encoded, flag.to_imap_string())
                    .await
            } else {
                executor
                    .uid_remove_flags(&uid_set, &encoded, flag.to_imap_string())
                    .await
            };
            if let Err(e) = stored {
                warn!(
                    "Failed to update {:?} on UID {} in {}: {:#?}",
                    flag, uid, folder_name, e
                );
                continue;
            }
            let Some(mut record) = MIRROR_STORE
                .read_message(account.user_id, &account.email, folder_name, uid)
                .await
            else {
                continue;
            };
            match flag {
                MessageFlag::Answered => record.flags.answered = value,
                MessageFlag::Flagged => record.flags.flagged = value,
                MessageFlag::Seen => record.flags.seen = value,
            }
            if let Err(e) = MIRROR_STORE
                .write_message(account.user_id, &account.email, folder_name, &record)
                .await
            {
                warn!(
                    "Failed to patch cached flags for UID {} in {}: {:#?}",
                    uid, folder_name, e
                );
            }
        }
        Ok(OperationStatus::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imap_flag_names() {
        assert_eq!(MessageFlag::Answered.to_imap_string(), "\\Answered");
        assert_eq!(MessageFlag::Flagged.to_imap_string(), "\\Flagged");
        assert_eq!(MessageFlag::Seen.to_imap_string(), "\\Seen");
    }

    #[test]
    fn test_unknown_flag_name_fails_parsing() {
        assert!(serde_json::from_str::<MessageFlag>("\"Seen\"").is_ok());
        assert!(serde_json::from_str::<MessageFlag>("\"Junk\"").is_err());
        assert!(serde_json::from_str::<MessageFlag>("\"deleted\"").is_err());
    }
}
