// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use paytrack::{cli, commands, config::Config, db, session::Session};

fn main() -> Result<()> {
    let cfg = Config::from_env()?;

    // Logs go to stderr so tables and JSON on stdout stay pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();
    let conn = db::open_or_init(&cfg)?;
    let mut session = Session::load(&conn)?;

    commands::dispatch(&conn, &cfg, &mut session, &matches)
        .inspect_err(|e| tracing::debug!(error = %e, "command failed"))
}
