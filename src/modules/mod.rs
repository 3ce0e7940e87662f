// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod account;
pub mod cache;
pub mod common;
pub mod context;
pub mod envelope;
pub mod error;
pub mod hook;
pub mod imap;
pub mod logger;
pub mod mailbox;
pub mod mime;
pub mod settings;
pub mod smtp;
pub mod utils;
