// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use crate::modules::error::code::ErrorCode;
use crate::modules::error::{MailMirrorError, MailMirrorResult};
use crate::modules::hook::{NatsConfig, NatsConnectionManager};
use crate::raise_error;
use bb8::Pool;

impl bb8::ManageConnection for NatsConnectionManager {
    type Connection = async_nats::jetstream::Context;

    type Error = MailMirrorError;

    async fn connect(&self) -> Result<Self::Connection, Self::Error> {
        self.build().await
    }

    async fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        conn.query_account().await.map_err(|error| {
            raise_error!(
                format!("NATS connection validation failed: {}", error),
                ErrorCode::NatsConnectionFailed
            )
        })?;
        Ok(())
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

pub async fn build_nats_pool(
    config: &NatsConfig,
) -> MailMirrorResult<Pool<NatsConnectionManager>> {
    let manager = NatsConnectionManager::new(config);
    let pool = Pool::builder()
        .connection_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(120))
        .retry_connection(true)
        .max_size(10)
        .test_on_check_out(true)
        .build(manager)
        .await?;
    Ok(pool)
}
