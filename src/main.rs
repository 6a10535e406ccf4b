// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use easytestenv::{Config, TestEnv};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, defaulting to info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!("usage: easytestenv <path>...");
    }

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: crd_paths={}, recursive={}, concurrency={}",
        config.crd_directory_paths.len(),
        config.recursive,
        config.concurrency
    );

    let env = TestEnv::start(config).await?;
    info!("Connected to Kubernetes cluster");

    // Ctrl-C aborts whatever is in flight
    let token = env.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            token.cancel();
        }
    });

    let mut total = 0;
    for path in &paths {
        let created = env
            .apply_resources(path)
            .await
            .with_context(|| format!("Failed to apply {}", path.display()))?;
        info!("Created {} resources from {}", created, path.display());
        total += created;
    }

    info!("Created {} resources in total", total);
    env.stop();
    Ok(())
}
