// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::AppError;
use crate::models::User;
use crate::session::Session;
use crate::utils::required_arg;
use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rusqlite::{Connection, OptionalExtension, params};

const MIN_PASSWORD_LEN: usize = 6;

pub fn handle(conn: &Connection, session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let email = normalize_email(&required_arg(sub, "email")?)?;
            let password = sub.get_one::<String>("password").cloned().unwrap_or_default();
            let first = required_arg(sub, "first-name")?;
            let last = required_arg(sub, "last-name")?;
            let user = register(conn, &email, &password, &first, &last)?;
            session.login(conn, user.id)?;
            println!("Welcome, {}! You are logged in as {}", user.first_name, user.email);
        }
        Some(("login", sub)) => {
            let email = normalize_email(&required_arg(sub, "email")?)?;
            let password = sub.get_one::<String>("password").cloned().unwrap_or_default();
            let user = authenticate(conn, &email, &password)?;
            session.login(conn, user.id)?;
            println!("Logged in as {}", user.email);
        }
        Some(("logout", _)) => {
            session.logout(conn)?;
            println!("Logged out");
        }
        Some(("whoami", _)) => {
            if session.is_demo() {
                println!("Demo mode (sample data)");
            } else if let Some(id) = session.user_id() {
                let u = user_by_id(conn, id)?;
                println!("{} {} <{}>", u.first_name, u.last_name, u.email);
            } else {
                println!("Not logged in");
            }
        }
        _ => {}
    }
    Ok(())
}

fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::InvalidInput(format!("'{}' is not an email address", raw.trim())).into()),
    }
}

pub fn register(
    conn: &Connection,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        ))
        .into());
    }
    let taken: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE email=?1", params![email], |r| r.get(0))
        .optional()?;
    if taken.is_some() {
        return Err(AppError::DuplicateEmail(email.to_string()).into());
    }
    let hash = hash_password(password)?;
    conn.execute(
        "INSERT INTO users(email, password_hash, first_name, last_name) VALUES (?1, ?2, ?3, ?4)",
        params![email, hash, first_name, last_name],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user_id = id, "user registered");
    user_by_id(conn, id)
}

/// Looks the user up by email and checks the password. Unknown email and
/// wrong password are indistinguishable to the caller.
pub fn authenticate(conn: &Connection, email: &str, password: &str) -> Result<User> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, password_hash FROM users WHERE email=?1",
            params![email],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    match row {
        Some((id, stored)) if verify_password(password, &stored) => user_by_id(conn, id),
        _ => {
            tracing::warn!("failed login attempt");
            Err(AppError::InvalidCredentials.into())
        }
    }
}

pub fn user_by_id(conn: &Connection, id: i64) -> Result<User> {
    conn.query_row(
        "SELECT id, email, first_name, last_name, created_at FROM users WHERE id=?1",
        params![id],
        |r| {
            Ok(User {
                id: r.get(0)?,
                email: r.get(1)?,
                first_name: r.get(2)?,
                last_name: r.get(3)?,
                created_at: r.get(4)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound { entity: "User", id }.into())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|h| Argon2::default().verify_password(password.as_bytes(), &h).is_ok())
        .unwrap_or(false)
}
