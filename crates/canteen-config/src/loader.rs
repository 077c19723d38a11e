// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `/etc/canteen/canteen.toml`, then
//! `~/.config/canteen/canteen.toml`, then `./canteen.toml`, then `CANTEEN_*`
//! environment variables. Later layers win.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CanteenConfig;

const SYSTEM_CONFIG: &str = "/etc/canteen/canteen.toml";
const LOCAL_CONFIG: &str = "canteen.toml";

/// Every TOML file the standard lookup consults, lowest priority first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("canteen").join("canteen.toml"));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG));
    paths
}

/// Builds the standard Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(CanteenConfig::default()));
    for path in config_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Loads configuration from the standard file hierarchy plus env vars.
pub fn load_config() -> Result<CanteenConfig, figment::Error> {
    build_figment().extract()
}

/// Loads configuration from an inline TOML string (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CanteenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CanteenConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Loads configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CanteenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CanteenConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `CANTEEN_SUBMISSION_MAX_RETRIES` becomes `submission.max_retries`.
///
/// Only the first underscore after a known section name is turned into a
/// dot, so keys that themselves contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed("CANTEEN_").map(|key| {
        let key = key.as_str();
        for section in ["app", "submission", "session", "menu", "shop"] {
            if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
                return format!("{section}.{rest}").into();
            }
        }
        key.to_string().into()
    })
}
