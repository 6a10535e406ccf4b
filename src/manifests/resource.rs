// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic manifest records and the single-file loader

use crate::error::{DecodeFailure, Result, TestEnvError};
use kube::api::{DynamicObject, GroupVersionKind};
use kube::ResourceExt;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::trace;

/// One resource document loaded from disk.
///
/// Only the type identity and `metadata` are interpreted; everything else
/// stays in [`DynamicObject::data`] untouched until it is sent to the cluster.
#[derive(Debug, Clone)]
pub struct ManifestResource {
    source: PathBuf,
    gvk: GroupVersionKind,
    object: DynamicObject,
}

impl ManifestResource {
    pub fn gvk(&self) -> &GroupVersionKind {
        &self.gvk
    }

    pub fn group(&self) -> &str {
        &self.gvk.group
    }

    pub fn version(&self) -> &str {
        &self.gvk.version
    }

    pub fn kind(&self) -> &str {
        &self.gvk.kind
    }

    /// `metadata.name`, falling back to `metadata.generateName`
    pub fn name(&self) -> String {
        self.object.name_any()
    }

    pub fn namespace(&self) -> Option<String> {
        self.object.namespace()
    }

    pub fn object(&self) -> &DynamicObject {
        &self.object
    }

    /// File the resource was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// `apiVersion` as written in the manifest
    pub fn api_version(&self) -> String {
        self.gvk.api_version()
    }
}

/// Read and decode the manifest at `path`.
///
/// Returns `Ok(None)` when the file is valid YAML (or JSON) but not a
/// recognizable resource, e.g. a README or an empty file.
pub fn load_manifest(path: &Path) -> Result<Option<ManifestResource>> {
    let contents = std::fs::read(path).map_err(|source| TestEnvError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    decode_manifest(path, &contents)
}

/// Decode manifest bytes; `path` is only used for error context
pub fn decode_manifest(path: &Path, contents: &[u8]) -> Result<Option<ManifestResource>> {
    let decode_error = |source: DecodeFailure| TestEnvError::DecodeError {
        path: path.to_path_buf(),
        source,
    };

    if contents.iter().all(u8::is_ascii_whitespace) {
        trace!("{} is empty", path.display());
        return Ok(None);
    }

    // Leading and trailing `---` separators produce empty documents; only
    // documents with content count.
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_slice(contents) {
        let value = serde_json::Value::deserialize(document).map_err(|e| decode_error(e.into()))?;
        if !value.is_null() {
            documents.push(value);
        }
    }

    if documents.len() > 1 {
        return Err(decode_error(DecodeFailure::MultipleDocuments(documents.len())));
    }
    let Some(value) = documents.pop() else {
        trace!("{} only holds empty documents", path.display());
        return Ok(None);
    };

    let Some(gvk) = gvk_from_manifest(&value) else {
        trace!("{} has no apiVersion/kind", path.display());
        return Ok(None);
    };

    let object: DynamicObject =
        serde_json::from_value(value).map_err(|e| decode_error(e.into()))?;

    Ok(Some(ManifestResource {
        source: path.to_path_buf(),
        gvk,
        object,
    }))
}

/// Extract the type identity from a decoded document.
///
/// Both `apiVersion` and `kind` must be non-empty strings; a core-group
/// `apiVersion` such as `v1` yields an empty group.
pub fn gvk_from_manifest(manifest: &serde_json::Value) -> Option<GroupVersionKind> {
    let api_version = manifest.get("apiVersion")?.as_str()?;
    let kind = manifest.get("kind")?.as_str()?;
    if api_version.is_empty() || kind.is_empty() {
        return None;
    }

    let (group, version) = api_version.split_once('/').unwrap_or(("", api_version));
    Some(GroupVersionKind::gvk(group, version, kind))
}
