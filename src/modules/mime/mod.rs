// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod decompose;
pub mod path;
pub mod sanitize;

/// Body written for a message whose raw content could not be parsed. The
/// message still mirrors; only its content is lost.
pub const ERROR_RETRIEVING_CONTENT: &str = "Error retrieving message content";
