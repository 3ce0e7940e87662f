// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::raise_error;
use crate::modules::{
    account::Account,
    error::MailMirrorResult,
    imap::{executor::ImapExecutor, pool::build_imap_pool},
    smtp::{executor::SmtpExecutor, pool::build_smtp_pool},
};
use dashmap::DashMap;
use std::sync::{Arc, LazyLock};
use tracing::info;

pub static MAIL_CONTEXT: LazyLock<MailClientExecutors> = LazyLock::new(MailClientExecutors::new);

/// Process-wide executor registry, one executor per (owning user, address).
/// Lookups go through reserve-style entry insertion, so two concurrent
/// requests for one key always land on the same executor.
pub struct MailClientExecutors {
    imap: DashMap<(u64, String), Arc<ImapExecutor>>,
    smtp: DashMap<(u64, String), Arc<SmtpExecutor>>,
}

impl MailClientExecutors {
    pub fn new() -> Self {
        Self {
            imap: DashMap::new(),
            smtp: DashMap::new(),
        }
    }

    pub async fn imap(&self, account: &Account) -> MailMirrorResult<Arc<ImapExecutor>> {
        let key = account.key();
        if let Some(executor) = self.imap.get(&key) {
            return Ok(executor.value().clone());
        }

        let pool = build_imap_pool(account.clone()).await?;
        let new_executor = Arc::new(ImapExecutor::new(pool));

        match self.imap.try_entry(key) {
            Some(dashmap::mapref::entry::Entry::Occupied(entry)) => Ok(entry.get().clone()),
            Some(dashmap::mapref::entry::Entry::Vacant(entry)) => {
                entry.insert(new_executor.clone());
                Ok(new_executor)
            }
            None => Err(raise_error!(
                "DashMap locked".into(),
                ErrorCode::InternalError
            )),
        }
    }

    pub async fn smtp(&self, account: &Account) -> MailMirrorResult<Arc<SmtpExecutor>> {
        let key = account.key();
        if let Some(executor) = self.smtp.get(&key) {
            return Ok(executor.value().clone());
        }

        let pool = build_smtp_pool(account.clone()).await?;
        let executor = Arc::new(SmtpExecutor::new(pool));

        match self.smtp.try_entry(key) {
            Some(dashmap::mapref::entry::Entry::Occupied(entry)) => Ok(entry.get().clone()),
            Some(dashmap::mapref::entry::Entry::Vacant(entry)) => {
                entry.insert(executor.clone());
                Ok(executor)
            }
            None => Err(raise_error!(
                "DashMap locked".into(),
                ErrorCode::InternalError
            )),
        }
    }

    /// Drops both executors for an account; their pools close with them.
    pub async fn clean_account(&self, user_id: u64, email: &str) -> MailMirrorResult<()> {
        let key = (user_id, email.to_string());
        if self.imap.remove(&key).is_some() {
            info!(user_id, email, "Closed IMAP pool for account");
        }

        if self.smtp.remove(&key).is_some() {
            info!(user_id, email, "Closed SMTP pool for account");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::account::{Encryption, MailServer};

    fn unreachable_account() -> Account {
        Account {
            user_id: 7,
            email: "probe@example.invalid".to_string(),
            initialized: false,
            imap: MailServer {
                host: "imap.example.invalid".to_string(),
                port: 993,
                encryption: Encryption::Ssl,
            },
            smtp: MailServer {
                host: "smtp.example.invalid".to_string(),
                port: 465,
                encryption: Encryption::Ssl,
            },
            username: "probe@example.invalid".to_string(),
            password: "secret".to_string(),
        }
    }

    // Pools connect lazily, so registering executors never touches the
    // network.
    #[tokio::test]
    async fn test_get_or_create_returns_same_executor() {
        let executors = MailClientExecutors::new();
        let account = unreachable_account();
        let first = executors.imap(&account).await.unwrap();
        let second = executors.imap(&account).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_clean_account_drops_registration() {
        let executors = MailClientExecutors::new();
        let account = unreachable_account();
        let first = executors.imap(&account).await.unwrap();
        executors
            .clean_account(account.user_id, &account.email)
            .await
            .unwrap();
        let second = executors.imap(&account).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
