// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// Connection security for one server endpoint.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Encryption {
    /// SSL/TLS encrypted connection
    #[default]
    Ssl,
    /// StartTLS encryption
    StartTls,
    /// Unencrypted connection
    None,
}

impl From<bool> for Encryption {
    fn from(value: bool) -> Self {
        if value {
            Encryption::Ssl
        } else {
            Encryption::None
        }
    }
}

impl Encryption {
    pub fn is_secure(&self) -> bool {
        !matches!(self, Encryption::None)
    }
}

/// One remote server endpoint (IMAP inbound or SMTP outbound).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MailServer {
    pub host: String,
    pub port: u16,
    pub encryption: Encryption,
}

/// An account bound to a mailbox session. Identity and credentials come from
/// the external account source; the value never changes for the life of a
/// session.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: u64,
    pub email: String,
    pub initialized: bool,
    pub imap: MailServer,
    pub smtp: MailServer,
    pub username: String,
    pub password: String,
}

impl Account {
    /// Registry key: one live connection per (owning user, address) pair.
    pub fn key(&self) -> (u64, String) {
        (self.user_id, self.email.clone())
    }
}

/// The account's durable mirror document, written to
/// `{userId}/{emailAddress}/account.json`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub email_address: String,
    pub user_id: u64,
    pub initialized: bool,
    pub mail_in_host_name: String,
    pub mail_in_port: u16,
    pub mail_in_secure: bool,
    pub mail_out_host_name: String,
    pub mail_out_port: u16,
    pub mail_out_secure: bool,
    pub username: String,
    pub password: String,
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        AccountRecord {
            email_address: account.email.clone(),
            user_id: account.user_id,
            initialized: account.initialized,
            mail_in_host_name: account.imap.host.clone(),
            mail_in_port: account.imap.port,
            mail_in_secure: account.imap.encryption.is_secure(),
            mail_out_host_name: account.smtp.host.clone(),
            mail_out_port: account.smtp.port,
            mail_out_secure: account.smtp.encryption.is_secure(),
            username: account.username.clone(),
            password: account.password.clone(),
        }
    }
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Account {
            user_id: record.user_id,
            email: record.email_address,
            initialized: record.initialized,
            imap: MailServer {
                host: record.mail_in_host_name,
                port: record.mail_in_port,
                encryption: Encryption::from(record.mail_in_secure),
            },
            smtp: MailServer {
                host: record.mail_out_host_name,
                port: record.mail_out_port,
                encryption: Encryption::from(record.mail_out_secure),
            },
            username: record.username,
            password: record.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            user_id: 42,
            email: "user@example.com".to_string(),
            initialized: true,
            imap: MailServer {
                host: "imap.example.com".to_string(),
                port: 993,
                encryption: Encryption::Ssl,
            },
            smtp: MailServer {
                host: "smtp.example.com".to_string(),
                port: 465,
                encryption: Encryption::Ssl,
            },
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_record_round_trip() {
        let account = sample_account();
        let record = AccountRecord::from(&account);
        assert_eq!(record.mail_in_secure, true);
        let restored = Account::from(record);
        assert_eq!(restored, account);
    }

    #[test]
    fn test_plain_endpoints_stay_plain() {
        let mut account = sample_account();
        account.imap.encryption = Encryption::None;
        let restored = Account::from(AccountRecord::from(&account));
        assert_eq!(restored.imap.encryption, Encryption::None);
    }

    #[test]
    fn test_record_uses_original_field_names() {
        let json = serde_json::to_value(AccountRecord::from(&sample_account())).unwrap();
        assert!(json.get("emailAddress").is_some());
        assert!(json.get("mailInHostName").is_some());
        assert!(json.get("mailOutPort").is_some());
    }
}
