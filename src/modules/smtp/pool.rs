// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::account::Account;
use crate::modules::error::MailMirrorError;
use crate::modules::error::MailMirrorResult;
use crate::modules::smtp::client::MailMirrorSmtpClient;
use crate::modules::smtp::client::Sender;
use crate::modules::smtp::manager::SmtpConnectionManager;
use bb8::Pool;
use std::time::Duration;

impl bb8::ManageConnection for SmtpConnectionManager {
    type Connection = MailMirrorSmtpClient;
    type Error = MailMirrorError;

    async fn connect(&self) -> MailMirrorResult<Self::Connection> {
        self.build().await
    }

    // Runs on every checkout; NOOP probes the link, RSET clears any state a
    // previous aborted transaction left behind.
    async fn is_valid(&self, conn: &mut Self::Connection) -> MailMirrorResult<()> {
        conn.send_noop().await?;
        conn.reset().await
    }

    fn has_broken(&self, _: &mut Self::Connection) -> bool {
        false
    }
}

/// One outbound transport per account, same sizing as the inbound side.
pub async fn build_smtp_pool(account: Account) -> MailMirrorResult<Pool<SmtpConnectionManager>> {
    let manager = SmtpConnectionManager::new(account);
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
