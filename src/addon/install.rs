use crate::{
    addon::{
        orchestrate::Orchestrator, provider::ProviderCatalog, source::HttpSource,
        summary::print_install_summary,
    },
    error::Result,
    types::{
        addon::{AddonRequest, FetchedAddon},
        installation::{Installation, InstalledAddon},
    },
    utils::{
        config::{Settings, installation_file, load_installation, save_installation},
        logger::{LogLevel, Logger},
    },
};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    pub addons: Vec<String>,
    pub path: Option<PathBuf>,
    pub timeout: Option<u64>,
}

/// Installs the requested addons, replacing everything in the installation directory.
///
/// ### Parameters
/// - `args`: Addon tokens (`name` or `name:provider`) and per-run overrides.
///
pub async fn install_addons(args: InstallArgs) -> Result<()> {
    let record_file = installation_file()?;
    let installation = load_installation(&record_file)?;
    let requests = AddonRequest::parse_all(&args.addons)?;
    let settings = Settings::resolve(args.path, args.timeout, &installation);

    let source = HttpSource::new(settings.timeout)?;
    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let orchestrator = Orchestrator::new(source, ProviderCatalog::builtin(), cancel);
    let outcome = orchestrator.install(&requests, &settings.target).await;
    ctrl_c.abort();
    let outcome = outcome?;

    print_install_summary(&outcome, &settings.target);

    if settings.target == PathBuf::from(&installation.path) {
        let updated = record_installation(installation, &outcome.addons, Utc::now());
        save_installation(&record_file, &updated)?;
        Logger::new().log_message(
            LogLevel::Debug,
            &format!("Recorded installation in {}", record_file.display()),
        );
    } else {
        Logger::new().log_message(
            LogLevel::Debug,
            &format!(
                "{} is not the configured installation path; record left unchanged",
                settings.target.display()
            ),
        );
    }

    Ok(())
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        Logger::new().log_message(LogLevel::Warning, "Interrupted, cancelling downloads...");
        cancel.cancel();
    }
}

/// The record after a run: the target was fully replaced, so it holds exactly `addons`.
pub fn record_installation(
    installation: Installation,
    addons: &[FetchedAddon],
    installed_at: DateTime<Utc>,
) -> Installation {
    Installation {
        path: installation.path,
        addons: addons
            .iter()
            .map(|a| InstalledAddon {
                name: a.request.name.clone(),
                provider: a.request.provider,
                release: a.release,
                archive_sha256: hex::encode(Sha256::digest(&a.bytes)),
                installed_at,
            })
            .collect(),
    }
}
