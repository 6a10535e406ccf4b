// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_MILLIS, POLL_MAX_INTERVAL_MILLIS};
use crate::error::{Result, TestEnvError};
use crate::manifests::ManifestResource;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{api::GroupVersionKind, discovery::oneshot::pinned_kind, Client};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// True for `apiextensions.k8s.io/v1` CustomResourceDefinition manifests
pub fn is_crd(resource: &ManifestResource) -> bool {
    resource.group() == "apiextensions.k8s.io" && resource.kind() == "CustomResourceDefinition"
}

/// Kinds a CRD manifest will make available, one per served version
pub fn served_kinds(resource: &ManifestResource) -> Vec<GroupVersionKind> {
    let crd: CustomResourceDefinition = match serde_json::to_value(resource.object())
        .and_then(serde_json::from_value)
    {
        Ok(crd) => crd,
        Err(e) => {
            warn!(
                "Cannot read CRD {} from {}, not waiting for it: {}",
                resource.name(),
                resource.source().display(),
                e
            );
            return Vec::new();
        }
    };

    crd.spec
        .versions
        .iter()
        .filter(|v| v.served)
        .map(|v| GroupVersionKind::gvk(&crd.spec.group, &v.name, &crd.spec.names.kind))
        .collect()
}

/// Wait until every kind in `kinds` is served by the API server.
/// This uses exponential backoff starting at POLL_INTERVAL_MILLIS, giving up after `timeout`.
#[instrument(skip(client, kinds, token), fields(kinds = kinds.len()))]
pub async fn wait_for_crds(
    client: &Client,
    kinds: &[GroupVersionKind],
    timeout: Duration,
    token: &CancellationToken,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    let mut interval = POLL_INTERVAL_MILLIS;
    let mut pending = kinds.to_vec();

    loop {
        let mut still_pending = Vec::new();
        for gvk in pending {
            let discovered = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(TestEnvError::CancelledError),
                discovered = pinned_kind(client, &gvk) => discovered,
            };
            match discovered {
                Ok(_) => debug!("{}/{} is served", gvk.api_version(), gvk.kind),
                Err(e) => {
                    debug!("{}/{} not yet served: {}", gvk.api_version(), gvk.kind, e);
                    still_pending.push(gvk);
                }
            }
        }
        pending = still_pending;

        if pending.is_empty() {
            info!("All {} CRD kinds are served", kinds.len());
            return Ok(());
        }

        if Instant::now() >= deadline {
            let names: Vec<String> = pending
                .iter()
                .map(|gvk| format!("{}/{}", gvk.api_version(), gvk.kind))
                .collect();
            return Err(TestEnvError::CrdTimeoutError(names.join(", ")));
        }

        tokio::select! {
            _ = token.cancelled() => return Err(TestEnvError::CancelledError),
            _ = sleep(Duration::from_millis(interval)) => {}
        }

        // Exponential backoff with max cap
        interval = (interval * 2).min(POLL_MAX_INTERVAL_MILLIS);
    }
}
