// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::smtp::client::Sender;
use crate::modules::{error::MailMirrorResult, smtp::manager::SmtpConnectionManager};
use bb8::Pool;
use mail_send::smtp::message::IntoMessage;

pub struct SmtpExecutor {
    pool: Pool<SmtpConnectionManager>,
}

impl SmtpExecutor {
    pub fn new(pool: Pool<SmtpConnectionManager>) -> Self {
        Self { pool }
    }

    pub async fn send_email<'x>(&self, message: impl IntoMessage<'x>) -> MailMirrorResult<()> {
        let mut client = self.pool.get().await?;
        client.send_email(message).await
    }
}
