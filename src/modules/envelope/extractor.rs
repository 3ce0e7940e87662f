// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use async_imap::types::{Fetch, Flag};
use mail_parser::MessageParser;
use tracing::warn;

use crate::modules::cache::record::{FlagsRecord, MessageRecord};
use crate::modules::common::AddrVec;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailMirrorResult;
use crate::modules::mime::decompose::{decompose, Decomposition};
use crate::modules::mime::sanitize::preview;
use crate::modules::mime::ERROR_RETRIEVING_CONTENT;
use crate::raise_error;

pub const DATE_FORMAT: &str = "%b %d %Y %H:%M";

/// Builds the durable message document from one sync fetch. A body that does
/// not parse degrades to the placeholder content; the document is still
/// written so the message exists in the mirror.
pub fn extract_message_record(fetch: &Fetch) -> MailMirrorResult<MessageRecord> {
    let uid = fetch.uid.ok_or_else(|| {
        raise_error!(
            "Fetch item carries no UID".into(),
            ErrorCode::ImapUnexpectedResult
        )
    })?;
    let flags = flags_record(fetch);

    let parsed = fetch.body().and_then(|raw| MessageParser::new().parse(raw));
    let record = match parsed {
        Some(message) => {
            let Decomposition { body, attachments } = decompose(&message);
            MessageRecord {
                attachments,
                bcc: message
                    .bcc()
                    .map(|a| AddrVec::from(a).join_addresses())
                    .unwrap_or_default(),
                body_preview: preview(&body),
                body,
                cc: message
                    .cc()
                    .map(|a| AddrVec::from(a).join_addresses())
                    .unwrap_or_default(),
                date: format_message_date(message.date()),
                flags,
                from: message
                    .from()
                    .map(|a| AddrVec::from(a).join_addresses())
                    .unwrap_or_default(),
                html: false,
                message_number: fetch.message,
                subject: message.subject().map(String::from).unwrap_or_default(),
                to: message
                    .to()
                    .map(|a| AddrVec::from(a).join_addresses())
                    .unwrap_or_default(),
                uid,
            }
        }
        None => {
            warn!("Message {} could not be parsed, mirroring placeholder body", uid);
            MessageRecord {
                attachments: Vec::new(),
                bcc: String::new(),
                body: ERROR_RETRIEVING_CONTENT.to_string(),
                body_preview: ERROR_RETRIEVING_CONTENT.to_string(),
                cc: String::new(),
                date: String::new(),
                flags,
                from: String::new(),
                html: false,
                message_number: fetch.message,
                subject: String::new(),
                to: String::new(),
                uid,
            }
        }
    };
    Ok(record)
}

pub(crate) fn flags_record(fetch: &Fetch) -> FlagsRecord {
    let mut record = FlagsRecord::default();
    for flag in fetch.flags() {
        match flag {
            Flag::Answered => record.answered = true,
            Flag::Deleted => record.deleted = true,
            Flag::Draft => record.draft = true,
            Flag::Flagged => record.flagged = true,
            Flag::Recent => record.recent = true,
            Flag::Seen => record.seen = true,
            Flag::Custom(_) => record.user = true,
            _ => {}
        }
    }
    record
}

pub(crate) fn format_message_date(date: Option<&mail_parser::DateTime>) -> String {
    date.and_then(|d| chrono::DateTime::from_timestamp(d.to_timestamp(), 0))
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_format_matches_mirror_convention() {
        let raw = "Date: Thu, 15 Jan 2026 10:30:00 +0000\r\n\
            Subject: x\r\n\
            \r\n\
            body\r\n";
        let message = MessageParser::new().parse(raw.as_bytes()).unwrap();
        assert_eq!(format_message_date(message.date()), "Jan 15 2026 10:30");
    }

    #[test]
    fn test_date_normalizes_to_utc() {
        let raw = "Date: Thu, 15 Jan 2026 10:30:00 +0200\r\n\
            Subject: x\r\n\
            \r\n\
            body\r\n";
        let message = MessageParser::new().parse(raw.as_bytes()).unwrap();
        assert_eq!(format_message_date(message.date()), "Jan 15 2026 08:30");
    }

    #[test]
    fn test_missing_date_reads_empty() {
        assert_eq!(format_message_date(None), "");
    }
}
