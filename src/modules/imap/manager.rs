// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::account::Account;
use crate::modules::error::MailMirrorResult;
use crate::modules::imap::client::Client;
use crate::modules::imap::session::SessionStream;
use async_imap::Session;
use tracing::error;

#[derive(Debug)]
pub struct ImapConnectionManager {
    pub account: Account,
}

impl ImapConnectionManager {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    async fn create_client(&self) -> MailMirrorResult<Client> {
        let imap = &self.account.imap;
        Client::connection(imap.host.clone(), imap.encryption, imap.port).await
    }

    pub async fn build(&self) -> MailMirrorResult<Session<Box<dyn SessionStream>>> {
        let client = match self.create_client().await {
            Ok(client) => client,
            Err(error) => {
                error!(
                    "Failed to create IMAP client for {}: {:#?}",
                    &self.account.email, error
                );
                return Err(error);
            }
        };

        let session = match client
            .login(&self.account.username, &self.account.password)
            .await
        {
            Ok(session) => session,
            Err(error) => {
                error!(
                    "Failed to authenticate IMAP session for {}: {:#?}",
                    &self.account.email, error
                );
                return Err(error);
            }
        };

        Ok(session)
    }
}
