// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Priority tiers for order-sensitive resource kinds

use kube::api::GroupVersionKind;

/// Ordered table of kinds that must be created before everything else.
///
/// Tier `i` holds the kinds listed in `tiers[i]`; any kind not listed falls
/// into the default tier, which is always the last one. Matching is exact on
/// group, version and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    tiers: Vec<Vec<GroupVersionKind>>,
}

impl PriorityTable {
    pub fn new(tiers: Vec<Vec<GroupVersionKind>>) -> Self {
        Self { tiers }
    }

    /// Tier index for `gvk`; the first matching tier wins
    pub fn classify(&self, gvk: &GroupVersionKind) -> usize {
        self.tiers
            .iter()
            .position(|tier| tier.iter().any(|entry| entry == gvk))
            .unwrap_or(self.default_tier())
    }

    /// Index of the catch-all tier for unlisted kinds
    pub fn default_tier(&self) -> usize {
        self.tiers.len()
    }

    /// Explicit tiers plus the default tier
    pub fn tier_count(&self) -> usize {
        self.tiers.len() + 1
    }
}

impl Default for PriorityTable {
    /// Namespaces and CRDs first, then admission webhooks, then everything else.
    fn default() -> Self {
        Self::new(vec![
            vec![
                GroupVersionKind::gvk("", "v1", "Namespace"),
                GroupVersionKind::gvk("apiextensions.k8s.io", "v1", "CustomResourceDefinition"),
            ],
            vec![
                GroupVersionKind::gvk(
                    "admissionregistration.k8s.io",
                    "v1",
                    "MutatingWebhookConfiguration",
                ),
                GroupVersionKind::gvk(
                    "admissionregistration.k8s.io",
                    "v1",
                    "ValidatingWebhookConfiguration",
                ),
            ],
        ])
    }
}
