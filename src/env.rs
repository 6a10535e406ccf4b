// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test environment: a client to the cluster under test plus manifest loading.

use crate::config::Config;
use crate::error::{Result, TestEnvError};
use crate::kubernetes::crd::{is_crd, served_kinds};
use crate::kubernetes::{create_client, wait_for_crds, DynamicCreator};
use crate::manifests::{apply_buckets, apply_resources, ApplyOptions, ManifestWalker, PriorityTable};
use kube::Client;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// A connected test environment.
///
/// Every operation is bound to one cancellation token; [`TestEnv::stop`]
/// cancels it, aborting in-flight creates and failing later calls with
/// [`TestEnvError::CancelledError`].
pub struct TestEnv {
    client: Client,
    creator: DynamicCreator,
    table: PriorityTable,
    config: Config,
    token: CancellationToken,
}

impl TestEnv {
    /// Connect to the configured cluster and install the configured CRDs
    #[instrument(skip(config), fields(crd_paths = config.crd_directory_paths.len()))]
    pub async fn start(config: Config) -> Result<Self> {
        let client = create_client(&config).await?;
        let env = Self::from_client(client, config);
        env.install_crds().await?;
        info!("Test environment ready");
        Ok(env)
    }

    /// Wrap an existing client; no CRDs are installed
    pub fn from_client(client: Client, config: Config) -> Self {
        Self {
            creator: DynamicCreator::new(client.clone()),
            client,
            table: PriorityTable::default(),
            config,
            token: CancellationToken::new(),
        }
    }

    /// Replace the priority table used to order creates
    pub fn with_priority_table(mut self, table: PriorityTable) -> Self {
        self.table = table;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn priority_table(&self) -> &PriorityTable {
        &self.table
    }

    /// Token every operation of this environment is bound to
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Create every CRD under the configured CRD paths and wait until the
    /// API server serves them. Returns the number of resources created.
    #[instrument(skip(self))]
    pub async fn install_crds(&self) -> Result<usize> {
        let mut created = 0;
        let mut kinds = Vec::new();

        for path in &self.config.crd_directory_paths {
            if !path.exists() {
                if self.config.error_if_crd_path_missing {
                    return Err(TestEnvError::CrdPathMissing(path.clone()));
                }
                warn!("CRD path {} does not exist, skipping", path.display());
                continue;
            }

            let buckets = ManifestWalker::new(&self.table)
                .recursive(self.config.recursive)
                .walk(path)?;

            created += apply_buckets(&self.creator, &buckets, &self.token, self.config.concurrency)
                .await?;

            kinds.extend(buckets.iter().filter(|r| is_crd(r)).flat_map(served_kinds));
        }

        if !kinds.is_empty() {
            info!("Waiting for {} CRD kinds to be served", kinds.len());
            wait_for_crds(
                &self.client,
                &kinds,
                self.config.crd_install_timeout,
                &self.token,
            )
            .await?;
        }

        Ok(created)
    }

    /// Create all resources at the given path, recursively if the path is a
    /// directory (unless disabled in the config). Returns the number created.
    pub async fn apply_resources(&self, path: impl AsRef<Path>) -> Result<usize> {
        let options = ApplyOptions {
            recursive: self.config.recursive,
            concurrency: self.config.concurrency,
        };
        apply_resources(&self.creator, &self.table, path.as_ref(), options, &self.token).await
    }

    /// Cancel everything bound to this environment
    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            info!("Stopping test environment");
            self.token.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
