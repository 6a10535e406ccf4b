// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{crd::DEFAULT_INSTALL_TIMEOUT_SECS, env as vars};
use crate::error::{Result, TestEnvError};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Test environment configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directories (or single files) of CRDs installed before the environment is handed out
    pub crd_directory_paths: Vec<PathBuf>,
    /// Fail startup when one of `crd_directory_paths` does not exist
    pub error_if_crd_path_missing: bool,
    /// Kubeconfig file to connect with; inferred from the environment when unset
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context; the current context when unset
    pub context: Option<String>,
    /// Descend into sub-directories when applying a directory
    pub recursive: bool,
    /// Creates issued at once within a single priority tier
    pub concurrency: usize,
    /// How long `install_crds` waits for installed CRDs to be served
    pub crd_install_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            crd_directory_paths: Vec::new(),
            error_if_crd_path_missing: false,
            kubeconfig: None,
            context: None,
            recursive: true,
            concurrency: 1,
            crd_install_timeout: Duration::from_secs(DEFAULT_INSTALL_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let crd_directory_paths = lookup(vars::CRD_PATHS)
            .map(|paths| {
                env::split_paths(&paths)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let concurrency: usize =
            parse_var(&lookup, vars::CONCURRENCY)?.unwrap_or(defaults.concurrency);
        if concurrency == 0 {
            return Err(TestEnvError::ConfigError(format!(
                "{} must be at least 1",
                vars::CONCURRENCY
            )));
        }

        Ok(Config {
            crd_directory_paths,
            error_if_crd_path_missing: parse_var(&lookup, vars::ERROR_IF_CRD_PATH_MISSING)?
                .unwrap_or(defaults.error_if_crd_path_missing),
            kubeconfig: lookup(vars::KUBECONFIG).map(PathBuf::from),
            context: lookup(vars::CONTEXT),
            recursive: parse_var(&lookup, vars::RECURSIVE)?.unwrap_or(defaults.recursive),
            concurrency,
            crd_install_timeout: parse_var(&lookup, vars::CRD_INSTALL_TIMEOUT_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.crd_install_timeout),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse().map_err(|e| {
                TestEnvError::ConfigError(format!("{}={:?} is invalid: {}", key, raw, e))
            })
        })
        .transpose()
}
