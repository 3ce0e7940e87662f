// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailMirrorResult;
use crate::raise_error;
use mail_send::smtp::message::IntoMessage;
use mail_send::SmtpClient;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

pub enum MailMirrorSmtpClient {
    Plain(SmtpClient<TcpStream>),
    Tls(SmtpClient<TlsStream<TcpStream>>),
}

pub(crate) trait Sender {
    async fn send_noop(&mut self) -> MailMirrorResult<()>;
    async fn reset(&mut self) -> MailMirrorResult<()>;
    async fn send_email<'x>(&mut self, message: impl IntoMessage<'x>) -> MailMirrorResult<()>;
}

impl Sender for MailMirrorSmtpClient {
    async fn send_noop(&mut self) -> MailMirrorResult<()> {
        match self {
            MailMirrorSmtpClient::Plain(smtp_client) => smtp_client
                .noop()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            MailMirrorSmtpClient::Tls(smtp_client) => smtp_client
                .noop()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }

    async fn reset(&mut self) -> MailMirrorResult<()> {
        match self {
            MailMirrorSmtpClient::Plain(smtp_client) => smtp_client
                .rset()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            MailMirrorSmtpClient::Tls(smtp_client) => smtp_client
                .rset()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }

    async fn send_email<'x>(&mut self, message: impl IntoMessage<'x>) -> MailMirrorResult<()> {
        match self {
            MailMirrorSmtpClient::Plain(smtp_client) => smtp_client
                .send(message)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            MailMirrorSmtpClient::Tls(smtp_client) => smtp_client
                .send(message)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }
}
