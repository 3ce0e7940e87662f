// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::settings::cli::SETTINGS;
use crate::{
    modules::error::{code::ErrorCode, MailMirrorResult},
    raise_error,
};
use async_nats::jetstream::{self};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod executor;
pub mod pool;

#[derive(Debug)]
pub struct NatsConnectionManager {
    config: NatsConfig,
}

impl NatsConnectionManager {
    pub fn new(config: &NatsConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub async fn build(&self) -> MailMirrorResult<async_nats::jetstream::Context> {
        self.config.create_producer().await
    }
}

#[derive(Default, Hash, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum NatsAuthType {
    #[default]
    None,
    Password,
    Token,
}

#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct NatsConfig {
    /// The hostname or IP address of the NATS server.
    pub host: String,
    /// The port number on which the NATS server is listening.
    pub port: u16,
    /// The authentication type used to connect to the NATS server.
    pub auth_type: NatsAuthType,
    /// Optional token for token-based authentication with the NATS server.
    pub token: Option<String>,
    /// Optional username for user-based authentication with the NATS server.
    pub username: Option<String>,
    /// Optional password for user-based authentication with the NATS server.
    pub password: Option<String>,
    /// The name of the NATS stream to which messages are published.
    pub stream_name: String,
    /// The namespace or subject prefix used for organizing messages in the NATS server.
    pub namespace: String,
}

impl NatsConfig {
    /// Assembles the notification channel configuration from the process
    /// settings. No configured host means the channel is disabled.
    pub fn from_settings() -> Option<Self> {
        let host = SETTINGS.mailmirror_nats_host.clone()?;
        let auth_type = if SETTINGS.mailmirror_nats_token.is_some() {
            NatsAuthType::Token
        } else if SETTINGS.mailmirror_nats_username.is_some() {
            NatsAuthType::Password
        } else {
            NatsAuthType::None
        };
        Some(NatsConfig {
            host,
            port: SETTINGS.mailmirror_nats_port,
            auth_type,
            token: SETTINGS.mailmirror_nats_token.clone(),
            username: SETTINGS.mailmirror_nats_username.clone(),
            password: SETTINGS.mailmirror_nats_password.clone(),
            stream_name: SETTINGS.mailmirror_nats_stream.clone(),
            namespace: SETTINGS.mailmirror_nats_namespace.clone(),
        })
    }

    pub fn validate(&self) -> MailMirrorResult<()> {
        let pattern = r"^[a-zA-Z][a-zA-Z0-9_]*$";
        let re = Regex::new(pattern).unwrap();
        if !re.is_match(&self.namespace) {
            return Err(raise_error!("Invalid namespace: namespace can only contain letters, numbers, and underscores, and must start with a letter.".into(), ErrorCode::InvalidParameter));
        }

        match self.auth_type {
            NatsAuthType::None => {}
            NatsAuthType::Password => {
                if self.username.is_none() || self.password.is_none() {
                    return Err(raise_error!(
                        "username and password are required when auth type is 'Password'".into(),
                        ErrorCode::InvalidParameter
                    ));
                }
            }
            NatsAuthType::Token => {
                if self.token.is_none() {
                    return Err(raise_error!(
                        "token is required when auth type is 'Token'".into(),
                        ErrorCode::InvalidParameter
                    ));
                }
            }
        }

        Ok(())
    }

    pub async fn create_producer(&self) -> MailMirrorResult<async_nats::jetstream::Context> {
        let nats_url = format!("nats://{}:{}", &self.host, &self.port);

        let client = match self.auth_type {
            NatsAuthType::None => async_nats::connect(&nats_url).await.map_err(|error| {
                raise_error!(
                    format!(
                        "Failed to connect to NATS server at {} without authentication. Error: {}",
                        nats_url, error
                    ),
                    ErrorCode::NatsConnectionFailed
                )
            })?,
            NatsAuthType::Password => {
                let username = self.username.clone().ok_or_else(|| {
                    raise_error!(
                        "Username is required for password authentication but was not provided"
                            .into(),
                        ErrorCode::InvalidParameter
                    )
                })?;
                let password = self.password.clone().ok_or_else(|| {
                    raise_error!(
                        "Password is required for password authentication but was not provided"
                            .into(),
                        ErrorCode::InvalidParameter
                    )
                })?;

                async_nats::connect_with_options(
                    &nats_url,
                    async_nats::ConnectOptions::new().user_and_password(username, password),
                )
                .await
                .map_err(|error| {
                    raise_error!(format!(
                        "Failed to connect to NATS server at {} with username/password authentication. Error: {}",
                        nats_url, error
                    ), ErrorCode::NatsConnectionFailed)
                })?
            }
            NatsAuthType::Token => {
                let token = self.token.clone().ok_or_else(|| {
                    raise_error!(
                        "Token is required for token authentication but was not provided".into(),
                        ErrorCode::InvalidParameter
                    )
                })?;

                async_nats::connect_with_options(
                    &nats_url,
                    async_nats::ConnectOptions::new().token(token),
                )
                .await
                .map_err(|error| {
                    raise_error!(format!(
                        "Failed to connect to NATS server at {} with token authentication. Error: {}",
                        nats_url, error
                    ), ErrorCode::NatsConnectionFailed)
                })?
            }
        };

        let jetstream = jetstream::new(client);

        jetstream
            .create_stream(jetstream::stream::Config {
                name: self.stream_name.to_string(),
                subjects: vec![format!("{}.>", self.namespace)],
                ..Default::default()
            })
            .await
            .map_err(|error| {
                raise_error!(
                    format!(
                        "Failed to create NATS stream '{}' in namespace '{}'. Error: {}",
                        self.stream_name, self.namespace, error
                    ),
                    ErrorCode::NatsCreateStreamFailed
                )
            })?;

        Ok(jetstream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> NatsConfig {
        NatsConfig {
            host: "localhost".to_string(),
            port: 4222,
            auth_type: NatsAuthType::None,
            token: None,
            username: None,
            password: None,
            stream_name: "mailmirror".to_string(),
            namespace: "mailmirror".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_plain_namespace() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dotted_namespace() {
        let mut config = base_config();
        config.namespace = "mail.mirror".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_password_pair() {
        let mut config = base_config();
        config.auth_type = NatsAuthType::Password;
        config.username = Some("svc".to_string());
        assert!(config.validate().is_err());
        config.password = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }
}
