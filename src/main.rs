use mimalloc::MiMalloc;
use tracing::{error, info};

use crate::modules::{
    account::Account,
    cache::store::MIRROR_STORE,
    common::rustls::MailMirrorTls,
    context::Initialize,
    error::MailMirrorResult,
    logger,
    mailbox::MailboxSession,
    settings::{cli::SETTINGS, dir::DataDirManager},
};

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

static LOGO: &str = r#"
 __  __       _ _ __  __ _
|  \/  | __ _(_) |  \/  (_)_ __ _ __ ___  _ __
| |\/| |/ _` | | | |\/| | | '__| '__/ _ \| '__|
| |  | | (_| | | | |  | | | |  | | | (_) | |
|_|  |_|\__,_|_|_|_|  |_|_|_|  |_|  \___/|_|

"#;

#[tokio::main]
async fn main() -> MailMirrorResult<()> {
    logger::initialize_logging();
    info!("{}", LOGO);
    info!("Starting mailmirror");
    info!("Version:  {}", mailmirror_version!());

    if let Err(error) = initialize().await {
        eprintln!("{:?}", error);
        return Err(error);
    }

    match SETTINGS.mailmirror_sync_interval_seconds {
        Some(seconds) => {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(seconds));
            loop {
                interval.tick().await;
                sweep_accounts().await;
            }
        }
        None => sweep_accounts().await,
    }
    Ok(())
}

async fn initialize() -> MailMirrorResult<()> {
    DataDirManager::initialize().await?;
    MailMirrorTls::initialize().await?;
    Ok(())
}

/// One pass over every account record found under the mirror root.
async fn sweep_accounts() {
    let records = match MIRROR_STORE.list_accounts().await {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to enumerate mirrored accounts: {:#?}", e);
            return;
        }
    };
    if records.is_empty() {
        info!("No mirrored accounts found under the data root");
        return;
    }
    for record in records {
        let email = record.email_address.clone();
        let session = MailboxSession::new(Account::from(record));
        match session.synchronize_account().await {
            Ok(status) => info!("Account {} synchronized, success={}", email, status.success),
            Err(e) => error!("Account {} synchronization failed: {:#?}", email, e),
        }
    }
}
