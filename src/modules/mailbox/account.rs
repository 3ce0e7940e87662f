// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::json;
use tracing::{error, warn};

use crate::modules::account::AccountRecord;
use crate::modules::cache::record::OperationStatus;
use crate::modules::cache::store::MIRROR_STORE;
use crate::modules::context::executors::MAIL_CONTEXT;
use crate::modules::error::MailMirrorResult;
use crate::modules::hook::executor::NATS_EXECUTORS;
use crate::modules::hook::NatsConfig;
use crate::modules::mailbox::MailboxSession;

/// Subject suffix for resync requests, published under the configured
/// namespace.
const UPDATE_SUBJECT: &str = "update";

impl MailboxSession {
    /// Writes the account mirror record for external readers and the sync
    /// runner.
    pub async fn store_account(&self) -> MailMirrorResult<OperationStatus> {
        MIRROR_STORE
            .write_account(&AccountRecord::from(&self.account))
            .await?;
        Ok(OperationStatus::success())
    }

    /// Removes the account's entire mirror subtree and drops its pooled
    /// executors.
    pub async fn delete_account(&self) -> MailMirrorResult<OperationStatus> {
        MIRROR_STORE
            .delete_account(self.account.user_id, &self.account.email)
            .await?;
        MAIL_CONTEXT
            .clean_account(self.account.user_id, &self.account.email)
            .await?;
        Ok(OperationStatus::success())
    }

    /// Sets the advisory lock marker for the account.
    pub async fn lock_account(&self) -> MailMirrorResult<OperationStatus> {
        MIRROR_STORE
            .write_lock(self.account.user_id, &self.account.email)
            .await?;
        Ok(OperationStatus::success())
    }

    pub async fn unlock_account(&self) -> MailMirrorResult<OperationStatus> {
        MIRROR_STORE
            .remove_lock(self.account.user_id, &self.account.email)
            .await?;
        Ok(OperationStatus::success())
    }

    /// Asks the external synchronizer to resync this account. Fire and
    /// forget: a missing channel configuration or a publish failure is
    /// logged and the call still reports success.
    pub async fn send_update_message(&self) -> MailMirrorResult<OperationStatus> {
        let Some(config) = NatsConfig::from_settings() else {
            warn!(
                "No NATS host configured, skipping synchronizer notification for {}",
                self.account.email
            );
            return Ok(OperationStatus::success());
        };
        if let Err(e) = self.publish_update(&config).await {
            error!(
                "Failed to notify synchronizer for {}: {:#?}",
                self.account.email, e
            );
        }
        Ok(OperationStatus::success())
    }

    async fn publish_update(&self, config: &NatsConfig) -> MailMirrorResult<()> {
        config.validate()?;
        let executor = NATS_EXECUTORS.get(config).await?;
        executor
            .publish(
                UPDATE_SUBJECT,
                json!({
                    "emailAddress": self.account.email,
                    "userId": self.account.user_id,
                }),
            )
            .await
    }
}
