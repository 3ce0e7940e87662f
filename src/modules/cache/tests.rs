// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use tempfile::tempdir;

use crate::modules::account::AccountRecord;
use crate::modules::cache::record::{FlagsRecord, FolderRecord, MessageRecord};
use crate::modules::cache::store::{MirrorStore, MESSAGE_FILE};

fn sample_message(uid: u32) -> MessageRecord {
    MessageRecord {
        attachments: vec![],
        bcc: String::new(),
        body: format!("<p>message {}</p>", uid),
        body_preview: format!("message {}", uid),
        cc: String::new(),
        date: "Jan 15 2026 10:30".to_string(),
        flags: FlagsRecord::default(),
        from: "alice@example.com".to_string(),
        html: false,
        message_number: uid,
        subject: format!("Subject {}", uid),
        to: "bob@example.com".to_string(),
        uid,
    }
}

fn sample_account(user_id: u64, email: &str) -> AccountRecord {
    AccountRecord {
        email_address: email.to_string(),
        user_id,
        initialized: false,
        mail_in_host_name: "imap.example.com".to_string(),
        mail_in_port: 993,
        mail_in_secure: true,
        mail_out_host_name: "smtp.example.com".to_string(),
        mail_out_port: 465,
        mail_out_secure: true,
        username: email.to_string(),
        password: "secret".to_string(),
    }
}

#[tokio::test]
async fn test_write_and_read_message() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    let record = sample_message(7);
    store
        .write_message(1, "a@example.com", "INBOX", &record)
        .await
        .unwrap();
    let restored = store.read_message(1, "a@example.com", "INBOX", 7).await;
    assert_eq!(restored, Some(record));
}

#[tokio::test]
async fn test_overwrite_replaces_document() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    let mut record = sample_message(3);
    store
        .write_message(1, "a@example.com", "INBOX", &record)
        .await
        .unwrap();
    record.flags.seen = true;
    store
        .write_message(1, "a@example.com", "INBOX", &record)
        .await
        .unwrap();
    let restored = store
        .read_message(1, "a@example.com", "INBOX", 3)
        .await
        .unwrap();
    assert!(restored.flags.seen);
}

#[tokio::test]
async fn test_delete_message_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    let record = sample_message(5);
    store
        .write_message(1, "a@example.com", "INBOX", &record)
        .await
        .unwrap();
    store
        .delete_message(1, "a@example.com", "INBOX", 5)
        .await
        .unwrap();
    assert!(store.read_message(1, "a@example.com", "INBOX", 5).await.is_none());
    store
        .delete_message(1, "a@example.com", "INBOX", 5)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_newest_message_picks_highest_uid() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    for uid in [3u32, 12, 9] {
        store
            .write_message(1, "a@example.com", "INBOX", &sample_message(uid))
            .await
            .unwrap();
    }
    // A nested child folder must not be mistaken for a message.
    store
        .write_message(1, "a@example.com", "INBOX/Archive", &sample_message(100))
        .await
        .unwrap();
    let newest = store.newest_message(1, "a@example.com", "INBOX").await.unwrap();
    assert_eq!(newest.uid, 12);
}

#[tokio::test]
async fn test_newest_message_empty_folder() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    assert!(store.newest_message(1, "a@example.com", "INBOX").await.is_none());
}

#[tokio::test]
async fn test_list_folders_walks_nested_records() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    for full_name in ["INBOX", "INBOX/Archive", "Drafts"] {
        let leaf = full_name.rsplit('/').next().unwrap().to_string();
        let record = FolderRecord {
            full_name: full_name.to_string(),
            name: leaf,
            message_count: 0,
            initialized: true,
            last_updated: "20260115103000".to_string(),
        };
        store.write_folder(1, "a@example.com", &record).await.unwrap();
    }
    store
        .write_message(1, "a@example.com", "INBOX", &sample_message(2))
        .await
        .unwrap();
    let mut names = store
        .list_folders(1, "a@example.com")
        .await
        .into_iter()
        .map(|r| r.full_name)
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(names, vec!["Drafts", "INBOX", "INBOX/Archive"]);
}

#[tokio::test]
async fn test_lock_write_and_remove() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    store.write_lock(1, "a@example.com").await.unwrap();
    let lock = store.read_lock(1, "a@example.com").await.unwrap();
    assert!(lock.locked);
    assert_eq!(lock.date_locked.len(), 14);
    assert!(lock.date_locked.chars().all(|c| c.is_ascii_digit()));
    store.remove_lock(1, "a@example.com").await.unwrap();
    assert!(store.read_lock(1, "a@example.com").await.is_none());
    store.remove_lock(1, "a@example.com").await.unwrap();
}

#[tokio::test]
async fn test_list_accounts_scans_layout() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    store
        .write_account(&sample_account(1, "a@example.com"))
        .await
        .unwrap();
    store
        .write_account(&sample_account(2, "b@example.com"))
        .await
        .unwrap();
    let mut emails = store
        .list_accounts()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.email_address)
        .collect::<Vec<_>>();
    emails.sort();
    assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn test_list_accounts_empty_root() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().join("missing"));
    assert!(store.list_accounts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_document_reads_as_absent() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    let message_dir = store.message_dir(1, "a@example.com", "INBOX", 4);
    tokio::fs::create_dir_all(&message_dir).await.unwrap();
    tokio::fs::write(message_dir.join(MESSAGE_FILE), b"not json")
        .await
        .unwrap();
    assert!(store.read_message(1, "a@example.com", "INBOX", 4).await.is_none());
}

#[tokio::test]
async fn test_delete_account_removes_subtree() {
    let dir = tempdir().unwrap();
    let store = MirrorStore::new(dir.path().to_path_buf());
    store
        .write_account(&sample_account(1, "a@example.com"))
        .await
        .unwrap();
    store
        .write_message(1, "a@example.com", "INBOX", &sample_message(9))
        .await
        .unwrap();
    store.delete_account(1, "a@example.com").await.unwrap();
    assert!(store.read_account(1, "a@example.com").await.is_none());
    assert!(store.read_message(1, "a@example.com", "INBOX", 9).await.is_none());
}
