// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tier-ordered creation of discovered manifests

use crate::error::{Result, TestEnvError};
use crate::manifests::priority::PriorityTable;
use crate::manifests::resource::ManifestResource;
use crate::manifests::walker::{ManifestWalker, TierBuckets};
use futures::{stream, TryStreamExt};
use std::future::Future;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Something that can create a resource in a cluster.
///
/// Failures are reported as the client reports them ("already exists",
/// "invalid", "unavailable", ...); retrying is up to the caller.
pub trait ResourceCreator {
    fn create(
        &self,
        resource: &ManifestResource,
    ) -> impl Future<Output = std::result::Result<(), kube::Error>> + Send;
}

/// Options for [`apply_resources`]
#[derive(Debug, Clone, Copy)]
pub struct ApplyOptions {
    /// Descend into sub-directories
    pub recursive: bool,
    /// Creates in flight at once inside a single tier. Tiers never overlap.
    pub concurrency: usize,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            concurrency: 1,
        }
    }
}

/// Discover every manifest under `path` and create them tier by tier.
///
/// Nothing is created unless discovery succeeds for the whole tree.
/// Returns the number of resources created.
#[instrument(skip_all, fields(path = %path.display(), recursive = options.recursive))]
pub async fn apply_resources<C: ResourceCreator>(
    creator: &C,
    table: &PriorityTable,
    path: &Path,
    options: ApplyOptions,
    token: &CancellationToken,
) -> Result<usize> {
    let buckets = ManifestWalker::new(table)
        .recursive(options.recursive)
        .walk(path)?;

    info!(
        "Applying {} resources from {}",
        buckets.len(),
        path.display()
    );

    apply_buckets(creator, &buckets, token, options.concurrency).await
}

/// Create every resource in `buckets`, tier 0 first.
///
/// Each tier finishes completely before the next starts. The first failure
/// stops the run; resources created so far are left in place.
#[instrument(skip_all, fields(resources = buckets.len(), concurrency = concurrency))]
pub async fn apply_buckets<C: ResourceCreator>(
    creator: &C,
    buckets: &TierBuckets,
    token: &CancellationToken,
    concurrency: usize,
) -> Result<usize> {
    let concurrency = concurrency.max(1);
    let mut created = 0;

    for (tier, resources) in buckets.tiers().enumerate() {
        if resources.is_empty() {
            continue;
        }
        if token.is_cancelled() {
            return Err(TestEnvError::CancelledError);
        }

        debug!(tier, count = resources.len(), "Applying tier");

        stream::iter(resources.iter().map(Ok::<_, TestEnvError>))
            .try_for_each_concurrent(concurrency, |resource| {
                create_resource(creator, resource, token)
            })
            .await?;

        created += resources.len();
    }

    info!("Created {} resources", created);
    Ok(created)
}

async fn create_resource<C: ResourceCreator>(
    creator: &C,
    resource: &ManifestResource,
    token: &CancellationToken,
) -> Result<()> {
    debug!(
        kind = resource.kind(),
        name = %resource.name(),
        namespace = ?resource.namespace(),
        "Creating resource"
    );

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(TestEnvError::CancelledError),
        result = creator.create(resource) => result.map_err(|source| TestEnvError::CreateError {
            group: resource.group().to_string(),
            version: resource.version().to_string(),
            kind: resource.kind().to_string(),
            namespace: resource.namespace(),
            name: resource.name(),
            source,
        }),
    }
}
