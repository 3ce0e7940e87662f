// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::{error, info, warn};

use crate::modules::cache::record::{FolderRecord, OperationStatus};
use crate::modules::cache::store::MIRROR_STORE;
use crate::modules::context::executors::MAIL_CONTEXT;
use crate::modules::envelope::extractor::extract_message_record;
use crate::modules::error::MailMirrorResult;
use crate::modules::mailbox::folders::RemoteFolder;
use crate::modules::mailbox::MailboxSession;
use crate::modules::settings::cli::SETTINGS;
use crate::{current_datetime, encode_mailbox_name};

impl MailboxSession {
    /// Mirrors every message-holding folder of the account, each in turn.
    /// A folder that fails is logged and skipped; the sweep reports success
    /// when the folder walk produced anything at all.
    pub async fn synchronize_account(&self) -> MailMirrorResult<OperationStatus> {
        let folders = self.list_folders().await?;
        for folder in &folders {
            if let Err(e) = self.synchronize_folder(folder).await {
                error!(
                    "Failed to synchronize folder {} of {}: {:#?}",
                    folder.full_name, self.account.email, e
                );
            }
        }
        Ok(OperationStatus {
            success: !folders.is_empty(),
        })
    }

    /// One folder's mirror round.
    ///
    /// The newest readable cached message supplies the incremental
    /// watermark, and only once the folder record says the first sync
    /// completed; until then the fetch range is the newest
    /// `prefetch_window` messages. The watermark message itself is
    /// refetched every round so flag changes made elsewhere land in the
    /// mirror.
    pub async fn synchronize_folder(&self, folder: &RemoteFolder) -> MailMirrorResult<()> {
        let account = &self.account;
        let record = MIRROR_STORE
            .read_folder(account.user_id, &account.email, &folder.full_name)
            .await;
        let initialized = record.as_ref().is_some_and(|record| record.initialized);
        let newest_uid = if initialized {
            MIRROR_STORE
                .newest_message(account.user_id, &account.email, &folder.full_name)
                .await
                .map(|message| message.uid)
        } else {
            None
        };

        let executor = MAIL_CONTEXT.imap(account).await?;
        let encoded = encode_mailbox_name!(&folder.full_name);
        let Some(batch) = executor
            .fetch_sync_batch(&encoded, SETTINGS.mailmirror_prefetch_window, newest_uid)
            .await?
        else {
            warn!("Folder {} unavailable, skipping", folder.full_name);
            return Ok(());
        };

        let mut mirrored = 0usize;
        for fetch in &batch.fetches {
            let message = match extract_message_record(fetch) {
                Ok(message) => message,
                Err(e) => {
                    warn!(
                        "Skipping unusable fetch item in {}: {:#?}",
                        folder.full_name, e
                    );
                    continue;
                }
            };
            if let Err(e) = MIRROR_STORE
                .write_message(account.user_id, &account.email, &folder.full_name, &message)
                .await
            {
                warn!(
                    "Failed to mirror message {} in {}: {:#?}",
                    message.uid, folder.full_name, e
                );
                continue;
            }
            mirrored += 1;
        }

        let folder_record = FolderRecord {
            full_name: folder.full_name.clone(),
            name: folder.name.clone(),
            message_count: batch.exists,
            initialized: true,
            last_updated: current_datetime!(),
        };
        MIRROR_STORE
            .write_folder(account.user_id, &account.email, &folder_record)
            .await?;
        info!(
            "Synchronized folder {} of {}: {} mirrored, {} on server",
            folder.full_name, account.email, mirrored, batch.exists
        );
        Ok(())
    }
}
