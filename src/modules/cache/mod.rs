// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod record;
pub mod store;
#[cfg(test)]
mod tests;
