// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::AppError;
use crate::models::{ActionKind, ActionLog};
use crate::session::Session;
use crate::utils::{maybe_print_json, parse_id, pretty_table, required_arg};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let user_id = session.require_user()?;
    match m.subcommand() {
        Some(("list", sub)) => {
            let limit = sub.get_one::<usize>("limit").copied();
            let data = list_logs(conn, user_id, limit)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|l| {
                        vec![
                            l.id.to_string(),
                            l.timestamp,
                            l.r#type.as_str().to_string(),
                            l.action,
                            l.details,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "When", "Type", "Action", "Details"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = parse_id(&required_arg(sub, "id")?)?;
            let n = conn.execute(
                "DELETE FROM action_logs WHERE id=?1 AND user_id=?2",
                params![id, user_id],
            )?;
            if n == 0 {
                return Err(AppError::NotFound {
                    entity: "Log entry",
                    id,
                }
                .into());
            }
            println!("Removed log entry {}", id);
        }
        Some(("clear", _)) => {
            let n = conn.execute("DELETE FROM action_logs WHERE user_id=?1", params![user_id])?;
            tracing::info!(user_id, removed = n, "activity log cleared");
            println!("Cleared {} log entries", n);
        }
        _ => {}
    }
    Ok(())
}

/// Appends an entry to the user's activity history.
pub fn record(
    conn: &Connection,
    user_id: i64,
    kind: ActionKind,
    action: &str,
    details: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO action_logs(user_id, action, details, type) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, action, details, kind.as_str()],
    )?;
    Ok(())
}

pub fn list_logs(conn: &Connection, user_id: i64, limit: Option<usize>) -> Result<Vec<ActionLog>> {
    let mut stmt = conn.prepare(
        "SELECT id, action, details, type, timestamp FROM action_logs
         WHERE user_id=?1 ORDER BY timestamp DESC, id DESC LIMIT ?2",
    )?;
    // SQLite treats a negative LIMIT as "no limit"
    let limit = limit.map(|l| l as i64).unwrap_or(-1);
    let rows = stmt.query_map(params![user_id, limit], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, action, details, kind, timestamp) = row?;
        let kind = kind
            .parse::<ActionKind>()
            .with_context(|| format!("Corrupt log entry {}", id))?;
        data.push(ActionLog {
            id,
            action,
            details,
            r#type: kind,
            timestamp,
        });
    }
    Ok(data)
}
