// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

pub const ENV_DB: &str = "PAYTRACK_DB";
pub const ENV_FEEDBACK_URL: &str = "PAYTRACK_FEEDBACK_URL";
pub const ENV_LOG: &str = "PAYTRACK_LOG";

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Explicit database location; `None` means the platform data dir.
    pub db_path: Option<PathBuf>,
    pub feedback_url: Option<String>,
    pub log_filter: String,
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self {
            db_path: non_empty(ENV_DB).map(PathBuf::from),
            feedback_url: non_empty(ENV_FEEDBACK_URL),
            log_filter: non_empty(ENV_LOG).unwrap_or_else(|| "warn".to_string()),
        })
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
