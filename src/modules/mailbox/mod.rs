// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::account::Account;

pub mod account;
pub mod attachment;
pub mod delete;
pub mod draft;
pub mod flag;
pub mod folders;
pub mod search;
pub mod send;
pub mod sync;

/// Entry point for all mailbox work against one account. The session holds
/// the account value only; live connections stay in the process-wide
/// executor registry so two sessions for the same account share one pool.
pub struct MailboxSession {
    account: Account,
}

impl MailboxSession {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}
