// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::errors::AppError;
use crate::session::Session;
use crate::utils::{http_client, optional_arg, pretty_table, required_arg};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackMessage<'a> {
    email: Option<&'a str>,
    message: &'a str,
    sent_at: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Delivery {
    Relayed,
    Queued,
}

pub fn handle(conn: &Connection, cfg: &Config, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("send", sub)) => {
            let message = required_arg(sub, "message")?;
            let email = optional_arg(sub, "email");
            match send(conn, cfg, session.user_id(), email.as_deref(), &message)? {
                Delivery::Relayed => println!("Thanks! Your feedback was sent."),
                Delivery::Queued => println!("Thanks! Your feedback was saved and will be reviewed."),
            }
        }
        Some(("list", _)) => {
            let data = queued_for(conn, session.require_user()?)?
                .into_iter()
                .map(|q| vec![q.id.to_string(), q.created_at, q.email.unwrap_or_default(), q.message])
                .collect();
            println!("{}", pretty_table(&["ID", "When", "Email", "Message"], data));
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedFeedback {
    pub id: i64,
    pub email: Option<String>,
    pub message: String,
    pub created_at: String,
}

/// Outbox rows the given user queued, newest first.
pub fn queued_for(conn: &Connection, user_id: i64) -> Result<Vec<QueuedFeedback>> {
    let mut stmt = conn.prepare(
        "SELECT id, email, message, created_at FROM feedback WHERE user_id=?1 ORDER BY id DESC",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(QueuedFeedback {
            id: r.get(0)?,
            email: r.get(1)?,
            message: r.get(2)?,
            created_at: r.get(3)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

/// Posts feedback to the configured endpoint, falling back to the local
/// outbox when no endpoint is set or the relay fails.
pub fn send(
    conn: &Connection,
    cfg: &Config,
    user_id: Option<i64>,
    email: Option<&str>,
    message: &str,
) -> Result<Delivery> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::InvalidInput("feedback message must not be empty".into()).into());
    }
    if let Some(url) = &cfg.feedback_url {
        let body = FeedbackMessage {
            email,
            message,
            sent_at: chrono::Utc::now().to_rfc3339(),
        };
        let sent = http_client().and_then(|c| Ok(c.post(url).json(&body).send()?.error_for_status()?));
        match sent {
            Ok(_) => {
                tracing::info!("feedback relayed");
                return Ok(Delivery::Relayed);
            }
            Err(e) => tracing::warn!(error = %e, "feedback relay failed; queueing locally"),
        }
    }
    conn.execute(
        "INSERT INTO feedback(user_id, email, message) VALUES (?1, ?2, ?3)",
        params![user_id, email, message],
    )?;
    Ok(Delivery::Queued)
}
