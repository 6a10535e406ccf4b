// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Manifest loading, priority classification, discovery and application.

pub mod apply;
pub mod priority;
pub mod resource;
pub mod walker;

pub use apply::{apply_buckets, apply_resources, ApplyOptions, ResourceCreator};
pub use priority::PriorityTable;
pub use resource::{load_manifest, ManifestResource};
pub use walker::{ManifestWalker, TierBuckets};
