// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::account::Account;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::{MailMirrorError, MailMirrorResult};
use crate::modules::imap::{manager::ImapConnectionManager, session::SessionStream};
use crate::raise_error;
use async_imap::Session;
use bb8::Pool;
use std::time::Duration;

impl bb8::ManageConnection for ImapConnectionManager {
    type Connection = Session<Box<dyn SessionStream>>;

    type Error = MailMirrorError;

    async fn connect(&self) -> MailMirrorResult<Self::Connection> {
        self.build().await
    }

    // Runs on every checkout; a dead session fails NOOP and is replaced.
    async fn is_valid(&self, conn: &mut Self::Connection) -> MailMirrorResult<()> {
        conn.noop()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))
    }

    fn has_broken(&self, _: &mut Self::Connection) -> bool {
        false
    }
}

/// Pool size is fixed at one: a single live IMAP connection per account, all
/// remote round-trips for that account serialized behind it.
pub async fn build_imap_pool(account: Account) -> MailMirrorResult<Pool<ImapConnectionManager>> {
    let manager = ImapConnectionManager::new(account);
    let pool = Pool::builder()
        .connection_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(120))
        .retry_connection(true)
        .max_size(1)
        .test_on_check_out(true)
        .build(manager)
        .await?;

    Ok(pool)
}
