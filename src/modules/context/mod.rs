// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::MailMirrorResult;

pub mod executors;

pub trait Initialize {
    async fn initialize() -> MailMirrorResult<()>;
}
