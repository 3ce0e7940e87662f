// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::account::{Account, Encryption};
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailMirrorResult;
use crate::modules::smtp::client::MailMirrorSmtpClient;
use crate::raise_error;
use mail_send::{Credentials, SmtpClientBuilder};
use std::time::Duration;

pub struct SmtpConnectionManager {
    pub account: Account,
}

impl SmtpConnectionManager {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    pub async fn build(&self) -> MailMirrorResult<MailMirrorSmtpClient> {
        let smtp = &self.account.smtp;
        let credentials = Credentials::new(
            self.account.username.clone(),
            self.account.password.clone(),
        );

        let builder = SmtpClientBuilder::new(smtp.host.clone(), smtp.port)
            .credentials(credentials)
            .timeout(Duration::from_secs(30));

        let client = match smtp.encryption {
            Encryption::Ssl => {
                let client = builder.implicit_tls(true).connect().await.map_err(|e| {
                    raise_error!(format!("{:#?}", e), ErrorCode::SmtpConnectionFailed)
                })?;
                MailMirrorSmtpClient::Tls(client)
            }
            Encryption::StartTls => {
                let client = builder.implicit_tls(false).connect().await.map_err(|e| {
                    raise_error!(format!("{:#?}", e), ErrorCode::SmtpConnectionFailed)
                })?;
                MailMirrorSmtpClient::Tls(client)
            }
            Encryption::None => {
                let client = builder.connect_plain().await.map_err(|e| {
                    raise_error!(format!("{:#?}", e), ErrorCode::SmtpConnectionFailed)
                })?;
                MailMirrorSmtpClient::Plain(client)
            }
        };

        Ok(client)
    }
}
