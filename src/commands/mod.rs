// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod dashboard;
pub mod demo;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod feedback;
pub mod logs;
pub mod payments;
pub mod users;

use crate::config::Config;
use crate::session::Session;
use crate::{cli, db, view};
use anyhow::Result;
use rusqlite::Connection;

/// Routes a parsed command line through the view gate to its handler.
pub fn dispatch(
    conn: &Connection,
    cfg: &Config,
    session: &mut Session,
    matches: &clap::ArgMatches,
) -> Result<()> {
    let Some((cmd, sub)) = matches.subcommand() else {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    };
    let current = view::view_for(&session.state());
    current.check(cmd, sub.subcommand_name())?;
    tracing::debug!(command = cmd, view = current.name(), "dispatching");

    match cmd {
        "init" => println!("Database initialized at {}", db::db_path(cfg)?.display()),
        "demo" => demo::handle(conn, session)?,
        "user" => users::handle(conn, session, sub)?,
        "expense" => expenses::handle(conn, session, sub)?,
        "payment" => payments::handle(conn, session, sub)?,
        "dashboard" => dashboard::handle(conn, session, sub)?,
        "log" => logs::handle(conn, session, sub)?,
        "feedback" => feedback::handle(conn, cfg, session, sub)?,
        "export" => exporter::handle(conn, session, sub)?,
        "doctor" => doctor::handle(conn, session)?,
        _ => {}
    }
    Ok(())
}
