// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{builder::ValueParser, Parser};
use std::{env, path::PathBuf, sync::LazyLock};

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Debug, Parser)]
#[clap(
    name = "mailmirror",
    about = "Mirrors remote IMAP mailboxes into a local JSON cache and writes
    flag, delete, and send operations back through to the mail server.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// mailmirror log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for mailmirror"
    )]
    pub mailmirror_log_level: String,

    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable ANSI colors in stdout logs"
    )]
    pub mailmirror_ansi_logs: bool,

    #[clap(
        long,
        default_value = "false",
        env,
        help = "Emit logs as JSON instead of plain text"
    )]
    pub mailmirror_json_logs: bool,

    #[clap(
        long,
        default_value = "false",
        env,
        help = "Write logs to daily-rolling files under the data directory instead of stdout"
    )]
    pub mailmirror_log_to_file: bool,

    #[clap(
        long,
        default_value = "5",
        env,
        help = "Maximum number of rolled server log files to keep"
    )]
    pub mailmirror_max_server_log_files: usize,

    #[clap(
        long,
        env,
        help = "Set the root data directory for mailmirror (must be an existing, absolute directory path)",
        value_parser = ValueParser::new(|s: &str| {
            let path = PathBuf::from(s);
            if !path.is_absolute() {
                return Err("Path must be an absolute directory path".to_string());
            }
            if !path.exists() {
                return Err(format!("Path {:?} does not exist", path));
            }
            if !path.is_dir() {
                return Err(format!("Path {:?} is not a directory", path));
            }
            Ok(s.to_string())
        })
    )]
    pub mailmirror_root_dir: String,

    #[clap(
        long,
        default_value = "50",
        env,
        help = "Maximum number of newest messages fetched on the first synchronization of a folder",
        value_parser = ValueParser::new(|s: &str| {
            let value = s.parse::<u32>().map_err(|_| {
                format!("Invalid value: {}. Please provide a valid message count.", s)
            })?;
            if value < 1 {
                return Err("Prefetch window must be at least 1 message.".to_string());
            }
            Ok(value)
        })
    )]
    pub mailmirror_prefetch_window: u32,

    #[clap(
        long,
        env,
        help = "Interval in seconds between account sweeps; when unset, the runner synchronizes each account once and exits"
    )]
    pub mailmirror_sync_interval_seconds: Option<u64>,

    /// Hostname of the NATS server receiving synchronizer notifications.
    /// When unset, `send_update_message` degrades to a logged no-op.
    #[clap(
        long,
        env,
        help = "Set the NATS server host for synchronizer notifications"
    )]
    pub mailmirror_nats_host: Option<String>,

    #[clap(
        long,
        default_value = "4222",
        env,
        help = "Set the NATS server port for synchronizer notifications"
    )]
    pub mailmirror_nats_port: u16,

    #[clap(
        long,
        default_value = "mailmirror",
        env,
        help = "Set the NATS stream receiving synchronizer notifications"
    )]
    pub mailmirror_nats_stream: String,

    #[clap(
        long,
        default_value = "mailmirror",
        env,
        help = "Set the NATS subject namespace for synchronizer notifications"
    )]
    pub mailmirror_nats_namespace: String,

    #[clap(long, env, help = "Optional NATS username")]
    pub mailmirror_nats_username: Option<String>,

    #[clap(long, env, help = "Optional NATS password")]
    pub mailmirror_nats_password: Option<String>,

    #[clap(long, env, help = "Optional NATS authentication token")]
    pub mailmirror_nats_token: Option<String>,
}

impl Settings {
    #[cfg(test)]
    fn new_for_test() -> Self {
        Self {
            mailmirror_log_level: "info".to_string(),
            mailmirror_ansi_logs: false,
            mailmirror_json_logs: false,
            mailmirror_log_to_file: false,
            mailmirror_max_server_log_files: 5,
            mailmirror_root_dir: std::env::temp_dir()
                .join("mailmirror_data")
                .to_string_lossy()
                .into_owned(),
            mailmirror_prefetch_window: 50,
            mailmirror_sync_interval_seconds: None,
            mailmirror_nats_host: None,
            mailmirror_nats_port: 4222,
            mailmirror_nats_stream: "mailmirror".to_string(),
            mailmirror_nats_namespace: "mailmirror".to_string(),
            mailmirror_nats_username: None,
            mailmirror_nats_password: None,
            mailmirror_nats_token: None,
        }
    }
}
