// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::warn;

use crate::encode_mailbox_name;
use crate::modules::cache::record::OperationStatus;
use crate::modules::cache::store::MIRROR_STORE;
use crate::modules::context::executors::MAIL_CONTEXT;
use crate::modules::error::MailMirrorResult;
use crate::modules::mailbox::MailboxSession;
use crate::modules::utils::generate_uid_sequence;

const DELETED_FLAG: &str = "\\Deleted";

/// UIDs per STORE command line when marking a batch.
const STORE_CHUNK_SIZE: usize = 500;

impl MailboxSession {
    /// Marks one message deleted. With `expunge` the folder is closed right
    /// away, the only single-message path that removes it server side. The
    /// local cache subtree goes regardless.
    pub async fn delete_message(
        &self,
        folder_name: &str,
        uid: u32,
        expunge: bool,
    ) -> MailMirrorResult<OperationStatus> {
        let account = &self.account;
        let executor = MAIL_CONTEXT.imap(account).await?;
        let encoded = encode_mailbox_name!(folder_name);
        executor
            .uid_add_flags(&uid.to_string(), &encoded, DELETED_FLAG)
            .await?;
        if expunge {
            executor.close_mailbox(&encoded).await?;
        }
        if let Err(e) = MIRROR_STORE
            .delete_message(account.user_id, &account.email, folder_name, uid)
            .await
        {
            warn!(
                "Failed to drop cache for UID {} in {}: {:#?}",
                uid, folder_name, e
            );
        }
        Ok(OperationStatus::success())
    }

    /// Marks a batch deleted without expunging, drops each message's cache
    /// subtree, then closes the folder once so the server expunges the whole
    /// batch together.
    pub async fn delete_messages_by_uids(
        &self,
        folder_name: &str,
        uids: &[u32],
    ) -> MailMirrorResult<OperationStatus> {
        let account = &self.account;
        let executor = MAIL_CONTEXT.imap(account).await?;
        let encoded = encode_mailbox_name!(folder_name);
        for uid_set in generate_uid_sequence(uids.to_vec(), STORE_CHUNK_SIZE) {
            executor
                .uid_add_flags(&uid_set, &encoded, DELETED_FLAG)
                .await?;
        }
        for &uid in uids {
            if let Err(e) = MIRROR_STORE
                .delete_message(account.user_id, &account.email, folder_name, uid)
                .await
            {
                warn!(
                    "Failed to drop cache for UID {} in {}: {:#?}",
                    uid, folder_name, e
                );
            }
        }
        executor.close_mailbox(&encoded).await?;
        Ok(OperationStatus::success())
    }
}
