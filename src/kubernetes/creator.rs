// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource creation through the dynamic API

use crate::manifests::{ManifestResource, ResourceCreator};
use kube::{
    api::{Api, DynamicObject, GroupVersionKind, PostParams},
    discovery::{oneshot::pinned_kind, ApiResource, Scope},
    Client,
};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Creates arbitrary manifests, resolving each kind through API discovery.
///
/// Resolved kinds are cached for the lifetime of the creator. Unknown kinds
/// are looked up again on every call, so CRDs created earlier in the same
/// run become usable as soon as the server serves them.
pub struct DynamicCreator {
    client: Client,
    resolved: Mutex<HashMap<GroupVersionKind, (ApiResource, Scope)>>,
}

impl DynamicCreator {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    async fn resolve(&self, gvk: &GroupVersionKind) -> Result<(ApiResource, Scope), kube::Error> {
        let cached = self.resolved.lock().await.get(gvk).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let (resource, capabilities) = pinned_kind(&self.client, gvk).await?;
        debug!(
            "Resolved {}/{} to resource {} ({:?})",
            gvk.api_version(),
            gvk.kind,
            resource.plural,
            capabilities.scope
        );

        let entry = (resource, capabilities.scope);
        self.resolved.lock().await.insert(gvk.clone(), entry.clone());
        Ok(entry)
    }
}

impl ResourceCreator for DynamicCreator {
    async fn create(&self, resource: &ManifestResource) -> Result<(), kube::Error> {
        let (api_resource, scope) = self.resolve(resource.gvk()).await?;

        let api: Api<DynamicObject> = match scope {
            Scope::Namespaced => {
                let namespace = resource
                    .namespace()
                    .unwrap_or_else(|| self.client.default_namespace().to_string());
                Api::namespaced_with(self.client.clone(), &namespace, &api_resource)
            }
            Scope::Cluster => Api::all_with(self.client.clone(), &api_resource),
        };

        api.create(&PostParams::default(), resource.object()).await?;
        debug!("Created {} {}", resource.kind(), resource.name());
        Ok(())
    }
}
