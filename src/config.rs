//! Environment-driven application configuration.

use anyhow::Context;
use figment::{Figment, providers::Env};
use serde::Deserialize;

fn default_base_url() -> String {
    "http://vitibrasil.cnpuv.embrapa.br/index.php".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fetch_retries() -> u32 {
    3
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

/// Application configuration, extracted from the process environment.
///
/// Only `DATABASE_URL` is required; everything else has a sensible default.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_base_url")]
    pub vitibrasil_base_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_fetch_retries")]
    pub fetch_retries: u32,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Figment::new()
            .merge(Env::raw())
            .extract()
            .context("Failed to load config")
    }
}
