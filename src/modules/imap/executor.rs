// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::{error::MailMirrorResult, imap::manager::ImapConnectionManager};
use crate::raise_error;
use async_imap::types::{Fetch, Mailbox, Name};
use bb8::{Pool, PooledConnection};
use futures::TryStreamExt;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Fetch query used while mirroring. PEEK leaves the remote seen flag alone.
const SYNC_FETCH_QUERY: &str = "(UID FLAGS INTERNALDATE BODY.PEEK[])";

const BODY_FETCH_COMMAND: &str = "(BODY.PEEK[])";

const UID_ONLY: &str = "(UID)";

/// One round of folder synchronization input: the message count at selection
/// time and the raw fetches for the computed sequence range.
pub struct SyncBatch {
    pub exists: u32,
    pub fetches: Vec<Fetch>,
}

pub struct ImapExecutor {
    pool: Pool<ImapConnectionManager>,
}

impl ImapExecutor {
    pub fn new(pool: Pool<ImapConnectionManager>) -> Self {
        Self { pool }
    }

    pub async fn list_mailboxes(&self, pattern: &str) -> MailMirrorResult<Vec<Name>> {
        let mut session = self.pool.get().await?;
        let list = session
            .list(Some(""), Some(pattern))
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let result = list
            .try_collect::<Vec<Name>>()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(result)
    }

    pub async fn create_mailbox(&self, mailbox_name: &str) -> MailMirrorResult<()> {
        let mut session = self.pool.get().await?;
        session
            .create(mailbox_name)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(())
    }

    pub async fn examine_mailbox(&self, mailbox_name: &str) -> MailMirrorResult<Mailbox> {
        let mut session = self.pool.get().await?;
        session
            .examine(mailbox_name)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))
    }

    /// Next UID the mailbox will assign, read without selecting for write.
    pub async fn uid_next(&self, mailbox_name: &str) -> MailMirrorResult<u32> {
        let mailbox = self.examine_mailbox(mailbox_name).await?;
        mailbox.uid_next.ok_or_else(|| {
            raise_error!(
                format!("Mailbox {} reports no UIDNEXT", mailbox_name),
                ErrorCode::ImapUnexpectedResult
            )
        })
    }

    /// SELECTs a mailbox with one retry through a fresh checkout. The first
    /// failed attempt returns its session to the pool, where checkout
    /// validation replaces it if the connection died. A second failure means
    /// the mailbox itself is unavailable; that reads as `None` so sweeps can
    /// move on.
    pub(crate) async fn open_mailbox(
        &self,
        mailbox_name: &str,
    ) -> MailMirrorResult<Option<(PooledConnection<'_, ImapConnectionManager>, Mailbox)>> {
        let mut session = self.pool.get().await?;
        match session.select(mailbox_name).await {
            Ok(mailbox) => return Ok(Some((session, mailbox))),
            Err(e) => {
                warn!(
                    "Failed to open mailbox {}, retrying once: {:#?}",
                    mailbox_name, e
                );
                drop(session);
            }
        }
        let mut session = self.pool.get().await?;
        match session.select(mailbox_name).await {
            Ok(mailbox) => Ok(Some((session, mailbox))),
            Err(e) => {
                warn!(
                    "Mailbox {} still unavailable after retry: {:#?}",
                    mailbox_name, e
                );
                Ok(None)
            }
        }
    }

    /// CLOSE on a selected mailbox: expunges everything flagged deleted, then
    /// deselects.
    pub async fn close_mailbox(&self, mailbox_name: &str) -> MailMirrorResult<()> {
        let Some((mut session, _)) = self.open_mailbox(mailbox_name).await? else {
            return Err(raise_error!(
                format!("Mailbox {} unavailable", mailbox_name),
                ErrorCode::ImapUnexpectedResult
            ));
        };
        session
            .close()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))
    }

    /// Selects a mailbox and fetches the sequence range one sync round needs.
    ///
    /// With no watermark the range is the newest `prefetch_window` messages.
    /// With a watermark UID the range runs from that message's current
    /// sequence number through the end; a watermark that no longer resolves
    /// (expunged meanwhile) falls back to the windowed range. Returns `None`
    /// when the mailbox cannot be opened, same as `open_mailbox`.
    pub async fn fetch_sync_batch(
        &self,
        mailbox_name: &str,
        prefetch_window: u32,
        newest_uid: Option<u32>,
    ) -> MailMirrorResult<Option<SyncBatch>> {
        let Some((mut session, mailbox)) = self.open_mailbox(mailbox_name).await? else {
            return Ok(None);
        };
        let exists = mailbox.exists;
        if exists == 0 {
            return Ok(Some(SyncBatch {
                exists,
                fetches: Vec::new(),
            }));
        }

        let mut start = None;
        if let Some(uid) = newest_uid {
            let uid_set = uid.to_string();
            let list = session
                .uid_fetch(uid_set.as_str(), UID_ONLY)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
            let found = list
                .try_collect::<Vec<Fetch>>()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
            start = found.iter().find(|f| f.uid == Some(uid)).map(|f| f.message);
        }
        let start = start.unwrap_or_else(|| windowed_start(exists, prefetch_window));

        let sequence_set = format!("{}:{}", start, exists);
        debug!(
            "Fetching sequence range {} from mailbox {}",
            sequence_set, mailbox_name
        );
        let list = session
            .fetch(sequence_set.as_str(), SYNC_FETCH_QUERY)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let fetches = list
            .try_collect::<Vec<Fetch>>()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(Some(SyncBatch { exists, fetches }))
    }

    async fn uid_fetch_single(
        &self,
        uid: u32,
        mailbox_name: &str,
        query: &str,
    ) -> MailMirrorResult<Option<Fetch>> {
        let mut session = self.pool.get().await?;
        session
            .examine(mailbox_name)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let uid_set = uid.to_string();
        let list = session
            .uid_fetch(uid_set.as_str(), query)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let result = list
            .try_collect::<Vec<Fetch>>()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(result.into_iter().find(|f| f.uid == Some(uid)))
    }

    pub async fn uid_fetch_full_message(
        &self,
        uid: u32,
        mailbox_name: &str,
    ) -> MailMirrorResult<Option<Fetch>> {
        self.uid_fetch_single(uid, mailbox_name, BODY_FETCH_COMMAND)
            .await
    }

    /// Single-message fetch with the full mirror query, used when one new
    /// message must land in the cache outside a sync round.
    pub async fn uid_fetch_for_mirror(
        &self,
        uid: u32,
        mailbox_name: &str,
    ) -> MailMirrorResult<Option<Fetch>> {
        self.uid_fetch_single(uid, mailbox_name, SYNC_FETCH_QUERY)
            .await
    }

    async fn uid_flag_store(
        &self,
        uid_set: &str,
        mailbox_name: &str,
        query: &str,
    ) -> MailMirrorResult<Vec<Fetch>> {
        let Some((mut session, _)) = self.open_mailbox(mailbox_name).await? else {
            return Err(raise_error!(
                format!("Mailbox {} unavailable", mailbox_name),
                ErrorCode::ImapUnexpectedResult
            ));
        };
        let list = session
            .uid_store(uid_set, query)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let result = list
            .try_collect::<Vec<Fetch>>()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(result)
    }

    pub async fn uid_add_flags(
        &self,
        uid_set: &str,
        mailbox_name: &str,
        flags: &str,
    ) -> MailMirrorResult<Vec<Fetch>> {
        self.uid_flag_store(uid_set, mailbox_name, &format!("+FLAGS ({})", flags))
            .await
    }

    pub async fn uid_remove_flags(
        &self,
        uid_set: &str,
        mailbox_name: &str,
        flags: &str,
    ) -> MailMirrorResult<Vec<Fetch>> {
        self.uid_flag_store(uid_set, mailbox_name, &format!("-FLAGS ({})", flags))
            .await
    }

    pub async fn append(
        &self,
        mailbox_name: impl AsRef<str>,
        flags: Option<&str>,
        internaldate: Option<&str>,
        content: impl AsRef<[u8]>,
    ) -> MailMirrorResult<()> {
        let mut session = self.pool.get().await?;
        session
            .append(mailbox_name, flags, internaldate, content)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))
    }

    pub async fn uid_search(
        &self,
        mailbox_name: &str,
        query: &str,
    ) -> MailMirrorResult<HashSet<u32>> {
        let mut session = self.pool.get().await?;
        session
            .examine(mailbox_name)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let result = session
            .uid_search(query)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(result)
    }
}

/// First sequence number for a windowed fetch covering the newest
/// `prefetch_window` messages of a mailbox holding `exists` messages.
fn windowed_start(exists: u32, prefetch_window: u32) -> u32 {
    if exists > prefetch_window {
        exists - prefetch_window + 1
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use crate::modules::imap::executor::windowed_start;

    #[test]
    fn test_windowed_start() {
        assert_eq!(windowed_start(120, 50), 71);
        assert_eq!(windowed_start(51, 50), 2);
        assert_eq!(windowed_start(50, 50), 1);
        assert_eq!(windowed_start(3, 50), 1);
        assert_eq!(windowed_start(1, 1), 1);
    }
}
