use crate::{
    modules::{
        context::Initialize,
        error::{code::ErrorCode, MailMirrorResult},
    },
    raise_error,
};

pub struct MailMirrorTls;

impl Initialize for MailMirrorTls {
    async fn initialize() -> MailMirrorResult<()> {
        rustls::crypto::CryptoProvider::install_default(rustls::crypto::ring::default_provider())
            .map_err(|_| {
                raise_error!(
                    "failed to set crypto provider".into(),
                    ErrorCode::InternalError
                )
            })
    }
}
