// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Who is using the tracker right now.
//!
//! The session lives in the `settings` table so that it survives between
//! invocations. Every change bumps `session_generation`; another process
//! holding an older generation can call [`Session::changed_since`] to notice
//! a login or logout. Listeners inside this process get [`SessionEvent`]s
//! over a channel.

use crate::errors::AppError;
use crate::view::AppState;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::mpsc::{Receiver, Sender, channel};

const KEY_USER: &str = "session_user_id";
const KEY_MODE: &str = "session_mode";
const KEY_GENERATION: &str = "session_generation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { user_id: i64 },
    EnteredDemo,
    LoggedOut,
}

#[derive(Debug, Default)]
pub struct Session {
    user_id: Option<i64>,
    demo: bool,
    generation: i64,
    listeners: Vec<Sender<SessionEvent>>,
}

impl Session {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mode = get_setting(conn, KEY_MODE)?;
        let generation = read_generation(conn)?;
        let mut session = Session {
            generation,
            ..Default::default()
        };
        match mode.as_deref() {
            Some("demo") => session.demo = true,
            Some("user") => {
                let id = get_setting(conn, KEY_USER)?.and_then(|s| s.parse::<i64>().ok());
                // A session pointing at a removed user is no session at all.
                if let Some(id) = id {
                    let exists: Option<i64> = conn
                        .query_row("SELECT id FROM users WHERE id=?1", params![id], |r| r.get(0))
                        .optional()?;
                    session.user_id = exists;
                }
            }
            _ => {}
        }
        Ok(session)
    }

    pub fn state(&self) -> AppState {
        match (self.demo, self.user_id) {
            (true, _) => AppState::Demo,
            (false, Some(user_id)) => AppState::Authenticated { user_id },
            (false, None) => AppState::Unauthenticated,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn generation(&self) -> i64 {
        self.generation
    }

    /// The logged-in user, for commands that read or write owned rows.
    pub fn require_user(&self) -> Result<i64, AppError> {
        if self.demo {
            return Err(AppError::DemoReadOnly);
        }
        self.user_id.ok_or(AppError::NotLoggedIn)
    }

    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = channel();
        self.listeners.push(tx);
        rx
    }

    pub fn login(&mut self, conn: &Connection, user_id: i64) -> Result<()> {
        self.persist(conn, Some("user"), Some(user_id))?;
        self.user_id = Some(user_id);
        self.demo = false;
        self.emit(SessionEvent::LoggedIn { user_id });
        Ok(())
    }

    pub fn enter_demo(&mut self, conn: &Connection) -> Result<()> {
        self.persist(conn, Some("demo"), None)?;
        self.user_id = None;
        self.demo = true;
        self.emit(SessionEvent::EnteredDemo);
        Ok(())
    }

    pub fn logout(&mut self, conn: &Connection) -> Result<()> {
        self.persist(conn, None, None)?;
        self.user_id = None;
        self.demo = false;
        self.emit(SessionEvent::LoggedOut);
        Ok(())
    }

    /// True when some process has changed the session after `generation`.
    pub fn changed_since(conn: &Connection, generation: i64) -> Result<bool> {
        Ok(read_generation(conn)? != generation)
    }

    fn persist(&mut self, conn: &Connection, mode: Option<&str>, user_id: Option<i64>) -> Result<()> {
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM settings WHERE key IN (?1, ?2)",
            params![KEY_MODE, KEY_USER],
        )?;
        if let Some(mode) = mode {
            set_setting(&tx, KEY_MODE, mode)?;
        }
        if let Some(id) = user_id {
            set_setting(&tx, KEY_USER, &id.to_string())?;
        }
        let next = read_generation(&tx)? + 1;
        set_setting(&tx, KEY_GENERATION, &next.to_string())?;
        tx.commit()?;
        self.generation = next;
        Ok(())
    }

    fn emit(&mut self, event: SessionEvent) {
        tracing::info!(?event, generation = self.generation, "session changed");
        // Dropped receivers are pruned.
        self.listeners.retain(|l| l.send(event).is_ok());
    }
}

fn read_generation(conn: &Connection) -> Result<i64> {
    Ok(get_setting(conn, KEY_GENERATION)?
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0))
}

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| r.get(0))
        .optional()?;
    Ok(v)
}

fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
