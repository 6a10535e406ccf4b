// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod env;
pub mod error;
pub mod kubernetes;
pub mod manifests;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::Config;
pub use env::TestEnv;
pub use error::{Result, TestEnvError};
