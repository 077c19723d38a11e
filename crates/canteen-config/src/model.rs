// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Night Canteen.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CanteenConfig {
    /// Process-level settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Remote endpoint delivery and retry settings.
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Session ledger and retry sweep settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Menu source settings.
    #[serde(default)]
    pub menu: MenuConfig,

    /// Shop identity and opening hours.
    #[serde(default)]
    pub shop: ShopConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Delivery settings for the submission core.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SubmissionConfig {
    /// Primary endpoint (the spreadsheet web app).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Secondary endpoints, each tried once after the primary gives up.
    #[serde(default)]
    pub fallback_endpoints: Vec<String>,

    /// Attempts against the primary endpoint.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay; attempt `n` waits `retry_delay_ms * 2^(n-1)`.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-attempt timeout covering send and body read.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Sent as the `userAgent` payload field and the HTTP User-Agent header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Fixed `source` tag added to every payload.
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            fallback_endpoints: Vec::new(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            source_tag: default_source_tag(),
        }
    }
}

fn default_endpoint() -> String {
    "https://script.google.com/macros/s/AKfycbxDzYxMyyXyxgFBZ8fNGUBWD0RItaJvG7tSNxQ8UzqW29hkmRRuxrEpJyo7T6oKpPii/exec".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    format!("night-canteen/{}", env!("CARGO_PKG_VERSION"))
}

fn default_source_tag() -> String {
    "night_canteen_app".to_string()
}

/// Session persistence, ledger bounds and retry sweep timing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default = "default_success_capacity")]
    pub success_capacity: usize,

    #[serde(default = "default_failure_capacity")]
    pub failure_capacity: usize,

    /// Delay between session start and the automatic retry sweep.
    #[serde(default = "default_retry_sweep_delay_ms")]
    pub retry_sweep_delay_ms: u64,

    /// JSON file holding the cart, last order and both ledgers between runs.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            success_capacity: default_success_capacity(),
            failure_capacity: default_failure_capacity(),
            retry_sweep_delay_ms: default_retry_sweep_delay_ms(),
            storage_path: default_storage_path(),
        }
    }
}

fn default_success_capacity() -> usize {
    10
}

fn default_failure_capacity() -> usize {
    5
}

fn default_retry_sweep_delay_ms() -> u64 {
    2000
}

fn default_storage_path() -> String {
    dirs::cache_dir()
        .map(|p| p.join("canteen").join("session.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("canteen-session.json"))
        .to_string_lossy()
        .into_owned()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MenuConfig {
    /// `http(s)://` URL or filesystem path of the menu JSON document.
    #[serde(default = "default_menu_source")]
    pub source: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            source: default_menu_source(),
        }
    }
}

fn default_menu_source() -> String {
    "items.json".to_string()
}

/// Shop identity printed on invoices, plus the nightly opening window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShopConfig {
    #[serde(default = "default_shop_name")]
    pub name: String,

    #[serde(default = "default_contact")]
    pub contact: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Local hour the shop opens (0-23).
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,

    /// Local hour the shop closes (0-23); may be earlier than `open_hour`.
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,

    /// Offset of shop-local time from UTC, in minutes (IST is 330).
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: default_shop_name(),
            contact: default_contact(),
            currency_symbol: default_currency_symbol(),
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

fn default_shop_name() -> String {
    "Night Canteen".to_string()
}

fn default_contact() -> String {
    "9341320141".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_open_hour() -> u32 {
    22
}

fn default_close_hour() -> u32 {
    1
}

fn default_utc_offset_minutes() -> i32 {
    330
}
