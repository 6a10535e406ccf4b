// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Manifest discovery: walks a path and buckets resources by priority tier

use crate::constants::manifests::EXTENSIONS;
use crate::error::{Result, TestEnvError};
use crate::manifests::priority::PriorityTable;
use crate::manifests::resource::{load_manifest, ManifestResource};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Resources discovered by one walk, grouped by tier in discovery order
#[derive(Debug, Clone, Default)]
pub struct TierBuckets {
    tiers: Vec<Vec<ManifestResource>>,
    skipped: Vec<PathBuf>,
}

impl TierBuckets {
    pub fn new(tier_count: usize) -> Self {
        Self {
            tiers: vec![Vec::new(); tier_count],
            skipped: Vec::new(),
        }
    }

    fn push(&mut self, tier: usize, resource: ManifestResource) {
        if tier >= self.tiers.len() {
            self.tiers.resize_with(tier + 1, Vec::new);
        }
        self.tiers[tier].push(resource);
    }

    /// Resources of one tier; empty for tiers that were never filled
    pub fn tier(&self, tier: usize) -> &[ManifestResource] {
        self.tiers.get(tier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tiers(&self) -> impl Iterator<Item = &[ManifestResource]> {
        self.tiers.iter().map(Vec::as_slice)
    }

    /// All resources, tier by tier, each tier in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &ManifestResource> {
        self.tiers.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Files that were passed over: wrong extension, or no recognizable resource inside
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }
}

/// Walks a file or directory tree and loads every manifest in it.
///
/// Directory entries are visited sorted by file name so the order within a
/// tier is reproducible. Inside a directory only `.yaml`, `.yml` and `.json`
/// files are loaded; a root given as a single file is always loaded. Any
/// read, traversal or decode failure aborts the walk.
pub struct ManifestWalker<'a> {
    table: &'a PriorityTable,
    recursive: bool,
}

impl<'a> ManifestWalker<'a> {
    pub fn new(table: &'a PriorityTable) -> Self {
        Self {
            table,
            recursive: true,
        }
    }

    /// Descend into sub-directories (the default). When disabled, only
    /// files directly inside the root directory are loaded.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    #[instrument(skip_all, fields(root = %root.display(), recursive = self.recursive))]
    pub fn walk(&self, root: &Path) -> Result<TierBuckets> {
        let metadata = std::fs::metadata(root).map_err(|source| TestEnvError::ReadError {
            path: root.to_path_buf(),
            source,
        })?;

        let mut buckets = TierBuckets::new(self.table.tier_count());

        if !metadata.is_dir() {
            self.visit(root, &mut buckets)?;
            return Ok(buckets);
        }

        let mut walker = WalkDir::new(root)
            .follow_links(true)
            .min_depth(1)
            .sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker {
            let entry = entry.map_err(|source| TestEnvError::WalkError {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                source,
            })?;

            // directories are descended into (or not) by walkdir itself;
            // sockets, fifos and the like are never manifests
            if !entry.file_type().is_file() {
                continue;
            }

            if !has_manifest_extension(entry.path()) {
                debug!(path = %entry.path().display(), "Skipping file without a manifest extension");
                buckets.skipped.push(entry.path().to_path_buf());
                continue;
            }

            self.visit(entry.path(), &mut buckets)?;
        }

        debug!(
            resources = buckets.len(),
            skipped = buckets.skipped.len(),
            "Discovered manifests"
        );
        Ok(buckets)
    }

    fn visit(&self, path: &Path, buckets: &mut TierBuckets) -> Result<()> {
        match load_manifest(path)? {
            Some(resource) => {
                let tier = self.table.classify(resource.gvk());
                debug!(
                    path = %path.display(),
                    kind = resource.kind(),
                    name = %resource.name(),
                    tier,
                    "Loaded manifest"
                );
                buckets.push(tier, resource);
            }
            None => {
                debug!(path = %path.display(), "Skipping file that is not a manifest");
                buckets.skipped.push(path.to_path_buf());
            }
        }
        Ok(())
    }
}

fn has_manifest_extension(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
}
