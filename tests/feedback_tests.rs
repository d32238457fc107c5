// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use paytrack::commands::{self, feedback};
use paytrack::config::Config;
use paytrack::errors::AppError;
use paytrack::session::Session;
use paytrack::{cli, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn outbox(conn: &Connection) -> Vec<(Option<String>, String)> {
    let mut stmt = conn.prepare("SELECT email, message FROM feedback ORDER BY id").unwrap();
    let rows: Vec<(Option<String>, String)> = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    rows
}

#[test]
fn feedback_is_queued_without_endpoint() {
    let conn = setup();
    let d = feedback::send(
        &conn,
        &Config::default(),
        None,
        Some("a@example.com"),
        "  Love the yearly view  ",
    )
    .unwrap();
    assert_eq!(d, feedback::Delivery::Queued);
    assert_eq!(
        outbox(&conn),
        vec![(Some("a@example.com".to_string()), "Love the yearly view".to_string())]
    );
}

#[test]
fn feedback_falls_back_when_relay_is_unreachable() {
    let conn = setup();
    let cfg = Config {
        feedback_url: Some("http://127.0.0.1:9/feedback".into()),
        ..Default::default()
    };
    let d = feedback::send(&conn, &cfg, None, None, "Dark mode please").unwrap();
    assert_eq!(d, feedback::Delivery::Queued);
    assert_eq!(outbox(&conn), vec![(None, "Dark mode please".to_string())]);
}

#[test]
fn empty_feedback_is_rejected() {
    let conn = setup();
    let err = feedback::send(&conn, &Config::default(), None, None, "   ").unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidInput(_))));
    assert!(outbox(&conn).is_empty());
}

#[test]
fn feedback_works_while_logged_out() {
    let conn = setup();
    let mut session = Session::load(&conn).unwrap();
    let matches = cli::build_cli().get_matches_from([
        "paytrack", "feedback", "send", "--message", "Works offline?",
    ]);
    commands::dispatch(&conn, &Config::default(), &mut session, &matches).unwrap();
    assert_eq!(outbox(&conn).len(), 1);
}

#[test]
fn outbox_listing_is_per_user() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO users(id,email,password_hash,first_name,last_name) VALUES (1,'a@example.com','x','A','A');
        INSERT INTO users(id,email,password_hash,first_name,last_name) VALUES (2,'b@example.com','x','B','B');
        "#,
    )
    .unwrap();
    let cfg = Config::default();
    feedback::send(&conn, &cfg, Some(1), Some("a@example.com"), "first").unwrap();
    feedback::send(&conn, &cfg, Some(2), None, "private note").unwrap();
    feedback::send(&conn, &cfg, None, None, "anonymous").unwrap();
    feedback::send(&conn, &cfg, Some(1), None, "second").unwrap();

    let mine: Vec<String> = feedback::queued_for(&conn, 1)
        .unwrap()
        .into_iter()
        .map(|q| q.message)
        .collect();
    assert_eq!(mine, vec!["second", "first"]);

    let mut session = Session::load(&conn).unwrap();
    session.login(&conn, 1).unwrap();
    let matches = cli::build_cli().get_matches_from(["paytrack", "feedback", "list"]);
    commands::dispatch(&conn, &cfg, &mut session, &matches).unwrap();
}
