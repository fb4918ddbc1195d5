use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::config::{self, Settings, API_URL_ENV};
use crate::errors::AccessiscanError;
use crate::notify::ConsoleNotifier;
use super::commands::Cli;

/// Everything a command handler needs: resolved settings, the backend
/// client and the notification surface.
pub struct AppContext {
    pub settings: Settings,
    pub client: Arc<ApiClient>,
    pub notifier: Arc<ConsoleNotifier>,
    pub quiet: bool,
}

impl AppContext {
    pub async fn from_cli(cli: &Cli) -> Result<Self, AccessiscanError> {
        let file_config = match &cli.config {
            Some(path) => Some(config::parse_config(&PathBuf::from(path)).await?),
            None => None,
        };

        let env_api_url = std::env::var(API_URL_ENV).ok();
        let settings = Settings::resolve(
            cli.api_url.as_deref(),
            env_api_url.as_deref(),
            file_config.as_ref(),
        )?;
        debug!(api_url = %settings.api_url, timezone = %settings.timezone, "Resolved settings");

        let client = ApiClient::new(&settings.api_url, settings.timeout)?;

        Ok(Self {
            settings,
            client: Arc::new(client),
            notifier: Arc::new(ConsoleNotifier::new(cli.quiet)),
            quiet: cli.quiet,
        })
    }
}

/// Token cancelled on Ctrl-C, for long-running waits.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            trigger.cancel();
        }
    });
    token
}
