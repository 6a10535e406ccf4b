// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables read by `Config::from_env`
pub mod env {
    /// CRD directories installed at startup, separated like `PATH`
    pub const CRD_PATHS: &str = "EASYTESTENV_CRD_PATHS";
    /// When "true", a missing CRD directory fails startup instead of being skipped
    pub const ERROR_IF_CRD_PATH_MISSING: &str = "EASYTESTENV_ERROR_IF_CRD_PATH_MISSING";
    /// Explicit kubeconfig file (otherwise inferred)
    pub const KUBECONFIG: &str = "EASYTESTENV_KUBECONFIG";
    /// Kubeconfig context to select
    pub const CONTEXT: &str = "EASYTESTENV_CONTEXT";
    /// When "false", only the top level of a manifest directory is loaded
    pub const RECURSIVE: &str = "EASYTESTENV_RECURSIVE";
    /// Maximum concurrent creates within one priority tier
    pub const CONCURRENCY: &str = "EASYTESTENV_CONCURRENCY";
    /// Seconds to wait for installed CRDs to be served
    pub const CRD_INSTALL_TIMEOUT_SECS: &str = "EASYTESTENV_CRD_INSTALL_TIMEOUT_SECS";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in milliseconds when waiting for CRDs
    pub const POLL_INTERVAL_MILLIS: u64 = 50;
    /// Maximum polling interval in milliseconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_MILLIS: u64 = 1000;
    /// Default time allowed for installed CRDs to become discoverable
    pub const DEFAULT_INSTALL_TIMEOUT_SECS: u64 = 30;
}

/// Manifest discovery
pub mod manifests {
    /// File extensions loaded when walking a directory, compared case-insensitively
    pub const EXTENSIONS: &[&str] = &["yaml", "yml", "json"];
}
