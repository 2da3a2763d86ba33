use crate::{
    addon::{
        fetch::fetch_archive, provider::ProviderCatalog, resolve::resolve_release,
        source::ReleaseSource,
    },
    error::{AddonFailure, InstallError, Result},
    installer::{
        apply::{InstallSummary, install},
        plan::plan,
    },
    types::addon::{AddonRequest, FetchedAddon},
    utils::{
        logger::{LogLevel, Logger},
        spinner::Spinner,
    },
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Drives resolve, download, plan and install for a set of addons.
pub struct Orchestrator<S: ReleaseSource> {
    source: Arc<S>,
    catalog: Arc<ProviderCatalog>,
    cancel: CancellationToken,
}

/// What one successful run produced.
#[derive(Debug)]
pub struct InstallOutcome {
    pub addons: Vec<FetchedAddon>,
    pub summary: InstallSummary,
}

impl<S: ReleaseSource> Orchestrator<S> {
    pub fn new(source: S, catalog: ProviderCatalog, cancel: CancellationToken) -> Self {
        Orchestrator {
            source: Arc::new(source),
            catalog: Arc::new(catalog),
            cancel,
        }
    }

    /// Runs the whole pipeline. Nothing under `target` changes unless every addon was fetched.
    pub async fn install(&self, requests: &[AddonRequest], target: &Path) -> Result<InstallOutcome> {
        let spinner = Spinner::new(format!("Resolving {} addon(s)...", requests.len()));
        let addons = match self.fetch_all(requests).await {
            Ok(addons) => addons,
            Err(e) => {
                spinner.fail("Download failed, the installation was left untouched");
                return Err(e);
            }
        };
        spinner.succeed(format!("Downloaded {} addon(s)", addons.len()));

        let spinner = Spinner::new(format!("Installing into {}...", target.display()));
        let result: Result<InstallSummary> = async {
            let plan = plan(&addons)?;
            install(plan, target).await
        }
        .await;
        match result {
            Ok(summary) => {
                spinner.succeed(format!(
                    "Installed {} file(s) into {}",
                    summary.files,
                    target.display()
                ));
                Ok(InstallOutcome { addons, summary })
            }
            Err(e) => {
                spinner.fail(format!("Installation failed: {}", e));
                Err(e)
            }
        }
    }

    /// Resolves and downloads every request concurrently.
    ///
    /// Waits for all tasks to settle. Results come back in request order so that a later
    /// token wins path collisions.
    pub async fn fetch_all(&self, requests: &[AddonRequest]) -> Result<Vec<FetchedAddon>> {
        let mut set: JoinSet<Result<FetchedAddon>> = JoinSet::new();
        let mut pending: HashMap<tokio::task::Id, (usize, AddonRequest)> = HashMap::new();

        for (index, request) in requests.iter().cloned().enumerate() {
            let source = Arc::clone(&self.source);
            let catalog = Arc::clone(&self.catalog);
            let cancel = self.cancel.clone();
            let task_request = request.clone();
            let handle = set.spawn(async move {
                cancel
                    .run_until_cancelled(resolve_then_fetch(&*source, &catalog, task_request))
                    .await
                    .unwrap_or(Err(InstallError::Cancelled))
            });
            pending.insert(handle.id(), (index, request));
        }

        let mut fetched: Vec<(usize, FetchedAddon)> = Vec::with_capacity(requests.len());
        let mut failures: Vec<(usize, AddonFailure)> = Vec::new();
        while let Some(joined) = set.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(e) => (
                    e.id(),
                    Err(InstallError::from(std::io::Error::other(format!(
                        "Join error: {}",
                        e
                    )))),
                ),
            };
            let Some((index, request)) = pending.remove(&id) else {
                continue;
            };

            match outcome {
                Ok(addon) => fetched.push((index, addon)),
                Err(error) => {
                    Logger::new().log_message(
                        LogLevel::Error,
                        &format!("{}: {}", request, error),
                    );
                    failures.push((
                        index,
                        AddonFailure {
                            addon: request.to_string(),
                            error,
                        },
                    ));
                }
            }
        }

        if !failures.is_empty() {
            if failures
                .iter()
                .all(|(_, f)| matches!(f.error, InstallError::Cancelled))
            {
                return Err(InstallError::Cancelled);
            }
            failures.sort_by_key(|(index, _)| *index);
            return Err(InstallError::AddonsFailed(
                failures.into_iter().map(|(_, f)| f).collect(),
            ));
        }

        fetched.sort_by_key(|(index, _)| *index);
        Ok(fetched.into_iter().map(|(_, addon)| addon).collect())
    }
}

async fn resolve_then_fetch<S: ReleaseSource>(
    source: &S,
    catalog: &ProviderCatalog,
    request: AddonRequest,
) -> Result<FetchedAddon> {
    let release = resolve_release(source, catalog, &request).await?;
    Logger::new().log_message(
        LogLevel::Debug,
        &format!("{} resolved to release {}", request, release),
    );

    let bytes = fetch_archive(source, catalog, &request, release).await?;
    Logger::new().log_message(
        LogLevel::Debug,
        &format!("{} release {}: {} bytes", request, release, bytes.len()),
    );

    Ok(FetchedAddon {
        request,
        release,
        bytes,
    })
}
