// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::modules::account::AccountRecord;
use crate::modules::cache::record::{FolderRecord, LockRecord, MessageRecord};
use crate::modules::error::{code::ErrorCode, MailMirrorResult};
use crate::modules::settings::dir::DATA_DIR_MANAGER;
use crate::raise_error;

pub const ACCOUNT_FILE: &str = "account.json";
pub const FOLDER_FILE: &str = "folder.json";
pub const MESSAGE_FILE: &str = "message.json";
pub const LOCK_FILE: &str = "lock.json";

pub static MIRROR_STORE: LazyLock<MirrorStore> =
    LazyLock::new(|| MirrorStore::new(DATA_DIR_MANAGER.mirror_dir.clone()));

/// Filesystem mirror of remote mailboxes. Layout under the root:
///
/// ```text
/// {userId}/{emailAddress}/account.json
/// {userId}/{emailAddress}/lock.json
/// {userId}/{emailAddress}/{folder...}/folder.json
/// {userId}/{emailAddress}/{folder...}/{uid}/message.json
/// ```
///
/// Folder full names are used verbatim as path segments, so a hierarchy
/// delimiter of `/` nests directories the same way the remote tree nests.
/// Every write replaces the whole document.
#[derive(Debug, Clone)]
pub struct MirrorStore {
    root: PathBuf,
}

impl MirrorStore {
    pub fn new(root: PathBuf) -> Self {
        MirrorStore { root }
    }

    pub fn account_dir(&self, user_id: u64, email: &str) -> PathBuf {
        self.root.join(user_id.to_string()).join(email)
    }

    pub fn folder_dir(&self, user_id: u64, email: &str, folder_name: &str) -> PathBuf {
        self.account_dir(user_id, email).join(folder_name)
    }

    pub fn message_dir(&self, user_id: u64, email: &str, folder_name: &str, uid: u32) -> PathBuf {
        self.folder_dir(user_id, email, folder_name)
            .join(uid.to_string())
    }

    async fn write_document<T: Serialize>(
        &self,
        dir: &Path,
        file_name: &str,
        document: &T,
    ) -> MailMirrorResult<()> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            raise_error!(
                format!("Failed to create mirror directory {}: {:#?}", dir.display(), e),
                ErrorCode::CacheIoError
            )
        })?;
        let json = serde_json::to_vec_pretty(document).map_err(|e| {
            raise_error!(
                format!("Failed to serialize mirror document: {:#?}", e),
                ErrorCode::CacheIoError
            )
        })?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, json).await.map_err(|e| {
            raise_error!(
                format!("Failed to write {}: {:#?}", path.display(), e),
                ErrorCode::CacheIoError
            )
        })
    }

    /// Reads and parses one document. A missing or unreadable file is not an
    /// error for callers; it reads as absent.
    async fn read_document<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read {}: {:#?}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("Failed to parse {}: {:#?}", path.display(), e);
                None
            }
        }
    }

    async fn remove_tree(&self, dir: &Path) -> MailMirrorResult<()> {
        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(raise_error!(
                format!("Failed to remove {}: {:#?}", dir.display(), e),
                ErrorCode::CacheIoError
            )),
        }
    }

    async fn remove_file(&self, path: &Path) -> MailMirrorResult<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(raise_error!(
                format!("Failed to remove {}: {:#?}", path.display(), e),
                ErrorCode::CacheIoError
            )),
        }
    }

    pub async fn write_account(&self, record: &AccountRecord) -> MailMirrorResult<()> {
        let dir = self.account_dir(record.user_id, &record.email_address);
        self.write_document(&dir, ACCOUNT_FILE, record).await
    }

    pub async fn read_account(&self, user_id: u64, email: &str) -> Option<AccountRecord> {
        let path = self.account_dir(user_id, email).join(ACCOUNT_FILE);
        self.read_document(&path).await
    }

    pub async fn delete_account(&self, user_id: u64, email: &str) -> MailMirrorResult<()> {
        let dir = self.account_dir(user_id, email);
        self.remove_tree(&dir).await
    }

    /// Scans the mirror root for account documents. Directories that do not
    /// follow the `{userId}/{emailAddress}` layout are skipped.
    pub async fn list_accounts(&self) -> MailMirrorResult<Vec<AccountRecord>> {
        let mut accounts = Vec::new();
        let mut user_dirs = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(accounts),
            Err(e) => {
                return Err(raise_error!(
                    format!("Failed to read mirror root {}: {:#?}", self.root.display(), e),
                    ErrorCode::CacheIoError
                ))
            }
        };
        while let Some(user_entry) = user_dirs.next_entry().await.map_err(|e| {
            raise_error!(
                format!("Failed to read mirror root entry: {:#?}", e),
                ErrorCode::CacheIoError
            )
        })? {
            if !user_entry.path().is_dir() {
                continue;
            }
            let mut account_dirs = tokio::fs::read_dir(user_entry.path()).await.map_err(|e| {
                raise_error!(
                    format!("Failed to read {}: {:#?}", user_entry.path().display(), e),
                    ErrorCode::CacheIoError
                )
            })?;
            while let Some(account_entry) = account_dirs.next_entry().await.map_err(|e| {
                raise_error!(
                    format!("Failed to read account entry: {:#?}", e),
                    ErrorCode::CacheIoError
                )
            })? {
                let path = account_entry.path().join(ACCOUNT_FILE);
                if let Some(record) = self.read_document::<AccountRecord>(&path).await {
                    accounts.push(record);
                }
            }
        }
        Ok(accounts)
    }

    pub async fn write_folder(
        &self,
        user_id: u64,
        email: &str,
        record: &FolderRecord,
    ) -> MailMirrorResult<()> {
        let dir = self.folder_dir(user_id, email, &record.full_name);
        self.write_document(&dir, FOLDER_FILE, record).await
    }

    pub async fn read_folder(
        &self,
        user_id: u64,
        email: &str,
        folder_name: &str,
    ) -> Option<FolderRecord> {
        let path = self.folder_dir(user_id, email, folder_name).join(FOLDER_FILE);
        self.read_document(&path).await
    }

    /// Enumerates every cached folder record under an account, depth first.
    /// Message directories (numeric UID segments holding a message document)
    /// are skipped; other directories are descended even without a folder
    /// document of their own, since a nested folder's parent segment may
    /// never have been mirrored itself.
    pub async fn list_folders(&self, user_id: u64, email: &str) -> Vec<FolderRecord> {
        let mut records = Vec::new();
        let mut pending = vec![self.account_dir(user_id, email)];
        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!("Failed to scan {}: {:#?}", dir.display(), e);
                    continue;
                }
            };
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Failed to scan {}: {:#?}", dir.display(), e);
                        break;
                    }
                };
                let path = entry.path();
                if !path.is_dir() {
                    continue;
                }
                let is_message_dir = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.parse::<u32>().is_ok())
                    && path.join(MESSAGE_FILE).is_file();
                if is_message_dir {
                    continue;
                }
                if let Some(record) = self.read_document(&path.join(FOLDER_FILE)).await {
                    records.push(record);
                }
                pending.push(path);
            }
        }
        records
    }

    pub async fn write_message(
        &self,
        user_id: u64,
        email: &str,
        folder_name: &str,
        record: &MessageRecord,
    ) -> MailMirrorResult<()> {
        let dir = self.message_dir(user_id, email, folder_name, record.uid);
        self.write_document(&dir, MESSAGE_FILE, record).await
    }

    pub async fn read_message(
        &self,
        user_id: u64,
        email: &str,
        folder_name: &str,
        uid: u32,
    ) -> Option<MessageRecord> {
        let path = self
            .message_dir(user_id, email, folder_name, uid)
            .join(MESSAGE_FILE);
        self.read_document(&path).await
    }

    pub async fn delete_message(
        &self,
        user_id: u64,
        email: &str,
        folder_name: &str,
        uid: u32,
    ) -> MailMirrorResult<()> {
        let dir = self.message_dir(user_id, email, folder_name, uid);
        self.remove_tree(&dir).await
    }

    pub async fn delete_folder(
        &self,
        user_id: u64,
        email: &str,
        folder_name: &str,
    ) -> MailMirrorResult<()> {
        let dir = self.folder_dir(user_id, email, folder_name);
        self.remove_tree(&dir).await
    }

    /// Returns the cached message with the highest UID in a folder, if any.
    /// Message directories are the numeric UID segments; anything else under
    /// the folder is a nested folder or the folder document itself.
    pub async fn newest_message(
        &self,
        user_id: u64,
        email: &str,
        folder_name: &str,
    ) -> Option<MessageRecord> {
        let dir = self.folder_dir(user_id, email, folder_name);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(_) => return None,
        };
        let mut newest: Option<u32> = None;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to scan {}: {:#?}", dir.display(), e);
                    break;
                }
            };
            let Some(name) = entry.file_name().to_str().map(|s| s.to_string()) else {
                continue;
            };
            let Ok(uid) = name.parse::<u32>() else {
                continue;
            };
            if entry.path().join(MESSAGE_FILE).is_file() {
                newest = Some(newest.map_or(uid, |current| current.max(uid)));
            }
        }
        let uid = newest?;
        self.read_message(user_id, email, folder_name, uid).await
    }

    pub async fn write_lock(&self, user_id: u64, email: &str) -> MailMirrorResult<()> {
        let dir = self.account_dir(user_id, email);
        let record = LockRecord {
            locked: true,
            date_locked: crate::current_datetime!(),
        };
        self.write_document(&dir, LOCK_FILE, &record).await
    }

    pub async fn read_lock(&self, user_id: u64, email: &str) -> Option<LockRecord> {
        let path = self.account_dir(user_id, email).join(LOCK_FILE);
        self.read_document(&path).await
    }

    pub async fn remove_lock(&self, user_id: u64, email: &str) -> MailMirrorResult<()> {
        let path = self.account_dir(user_id, email).join(LOCK_FILE);
        self.remove_file(&path).await
    }
}
