// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, LazyLock};

use bb8::Pool;
use dashmap::DashMap;
use tracing::error;

use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailMirrorResult;
use crate::modules::hook::pool::build_nats_pool;
use crate::modules::hook::{NatsConfig, NatsConnectionManager};
use crate::raise_error;

pub static NATS_EXECUTORS: LazyLock<NatsContextExecutors> =
    LazyLock::new(NatsContextExecutors::new);

/// Registry of JetStream producers, one per distinct NATS configuration.
pub struct NatsContextExecutors {
    nats: DashMap<NatsConfig, Arc<NatsExecutor>>,
}

impl NatsContextExecutors {
    fn new() -> Self {
        Self {
            nats: DashMap::new(),
        }
    }

    pub async fn get(&self, config: &NatsConfig) -> MailMirrorResult<Arc<NatsExecutor>> {
        if let Some(executor) = self.nats.get(config) {
            return Ok(executor.value().clone());
        }
        let pool = build_nats_pool(config).await?;
        let executor = Arc::new(NatsExecutor::new(config.clone(), pool));
        match self.nats.try_entry(config.clone()) {
            Some(dashmap::mapref::entry::Entry::Occupied(entry)) => Ok(entry.get().clone()),
            Some(dashmap::mapref::entry::Entry::Vacant(entry)) => {
                entry.insert(executor.clone());
                Ok(executor)
            }
            None => Err(raise_error!(
                "DashMap locked while registering NATS executor".into(),
                ErrorCode::InternalError
            )),
        }
    }
}

pub struct NatsExecutor {
    config: NatsConfig,
    pool: Pool<NatsConnectionManager>,
}

impl NatsExecutor {
    fn new(config: NatsConfig, pool: Pool<NatsConnectionManager>) -> Self {
        Self { config, pool }
    }

    /// Publishes a JSON payload on `<namespace>.<suffix>`.
    pub async fn publish(&self, suffix: &str, payload: serde_json::Value) -> MailMirrorResult<()> {
        let jetstream = self.pool.get().await?;
        let topic = format!("{}.{}", self.config.namespace, suffix);
        jetstream
            .publish(topic.clone(), payload.to_string().into())
            .await
            .map_err(|e| {
                error!("Failed to publish message to NATS topic '{}': {}", topic, e);
                raise_error!(
                    format!("Failed to publish message to NATS topic '{}': {}", topic, e),
                    ErrorCode::NatsPublishFailed
                )
            })?;
        Ok(())
    }
}
