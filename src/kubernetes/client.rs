// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client creation for the cluster under test

use crate::config::Config;
use crate::error::{Result, TestEnvError};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Create a Kubernetes client for the configured cluster.
///
/// Uses `config.kubeconfig` when set, otherwise infers the configuration
/// the usual way (`KUBECONFIG`, `~/.kube/config`, in-cluster).
#[instrument(skip(config))]
pub async fn create_client(config: &Config) -> Result<Client> {
    let client_config = match &config.kubeconfig {
        Some(path) => load_kubeconfig(path, config.context.as_deref()).await?,
        None if config.context.is_some() => {
            let options = KubeConfigOptions {
                context: config.context.clone(),
                ..Default::default()
            };
            KConfig::from_kubeconfig(&options).await.map_err(|e| {
                TestEnvError::KubeconfigError(format!("Failed to load kubeconfig: {}", e))
            })?
        }
        None => KConfig::infer()
            .await
            .map_err(|e| TestEnvError::KubeconfigError(format!("Failed to infer config: {}", e)))?,
    };

    info!("Connecting to {}", client_config.cluster_url);

    Client::try_from(client_config)
        .map_err(|e| TestEnvError::KubeconfigError(format!("Failed to create client: {}", e)))
}

/// Build a client configuration from a kubeconfig file
async fn load_kubeconfig(path: &Path, context: Option<&str>) -> Result<KConfig> {
    debug!("Reading kubeconfig from {}", path.display());

    let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
        TestEnvError::KubeconfigError(format!(
            "Failed to read kubeconfig {}: {}",
            path.display(),
            e
        ))
    })?;

    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };

    KConfig::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| TestEnvError::KubeconfigError(format!("Failed to create config: {}", e)))
}
