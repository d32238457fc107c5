// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use paytrack::commands::{self, users};
use paytrack::config::Config;
use paytrack::errors::AppError;
use paytrack::session::{Session, SessionEvent};
use paytrack::view::{AppState, View, view_for};
use paytrack::{cli, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, session: &mut Session, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["paytrack"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    commands::dispatch(conn, &Config::default(), session, &matches)
}

fn register(conn: &Connection, session: &mut Session, email: &str, password: &str) -> anyhow::Result<()> {
    run(
        conn,
        session,
        &[
            "user", "register", "--email", email, "--password", password, "--first-name", "Asha",
            "--last-name", "Kumar",
        ],
    )
}

#[test]
fn register_logs_in_and_normalizes_email() {
    let conn = setup();
    let mut session = Session::load(&conn).unwrap();
    assert_eq!(session.state(), AppState::Unauthenticated);

    register(&conn, &mut session, "  Asha@Example.COM ", "secret123").unwrap();
    let id = session.user_id().unwrap();
    assert_eq!(session.state(), AppState::Authenticated { user_id: id });
    let u = users::user_by_id(&conn, id).unwrap();
    assert_eq!(u.email, "asha@example.com");

    let stored: String = conn
        .query_row("SELECT password_hash FROM users WHERE id=?1", [id], |r| r.get(0))
        .unwrap();
    assert!(stored.starts_with("$argon2"));
    assert!(!stored.contains("secret123"));
}

#[test]
fn register_rejects_duplicates_and_weak_passwords() {
    let conn = setup();
    let mut session = Session::load(&conn).unwrap();
    register(&conn, &mut session, "asha@example.com", "secret123").unwrap();
    session.logout(&conn).unwrap();

    let err = register(&conn, &mut session, "ASHA@example.com", "another1").unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::DuplicateEmail(_))));

    let err = register(&conn, &mut session, "new@example.com", "123").unwrap_err();
    assert!(err.to_string().contains("at least 6"));

    let err = register(&conn, &mut session, "not-an-email", "secret123").unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidInput(_))));
}

#[test]
fn login_checks_password() {
    let conn = setup();
    users::register(&conn, "asha@example.com", "secret123", "Asha", "Kumar").unwrap();
    let mut session = Session::load(&conn).unwrap();

    let err = run(
        &conn,
        &mut session,
        &["user", "login", "--email", "asha@example.com", "--password", "wrong-one"],
    )
    .unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidCredentials)));

    let err = run(
        &conn,
        &mut session,
        &["user", "login", "--email", "nobody@example.com", "--password", "secret123"],
    )
    .unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidCredentials)));
    assert_eq!(session.state(), AppState::Unauthenticated);

    run(
        &conn,
        &mut session,
        &["user", "login", "--email", "asha@example.com", "--password", "secret123"],
    )
    .unwrap();
    assert!(session.user_id().is_some());
}

#[test]
fn session_survives_reload_and_bumps_generation() {
    let conn = setup();
    let user = users::register(&conn, "asha@example.com", "secret123", "Asha", "Kumar").unwrap();
    let mut first = Session::load(&conn).unwrap();
    let start = first.generation();

    first.login(&conn, user.id).unwrap();
    assert!(Session::changed_since(&conn, start).unwrap());
    assert!(!Session::changed_since(&conn, first.generation()).unwrap());

    let second = Session::load(&conn).unwrap();
    assert_eq!(second.state(), AppState::Authenticated { user_id: user.id });
    assert_eq!(second.generation(), first.generation());

    first.logout(&conn).unwrap();
    assert!(Session::changed_since(&conn, second.generation()).unwrap());
    assert_eq!(Session::load(&conn).unwrap().state(), AppState::Unauthenticated);
}

#[test]
fn subscribers_hear_every_change() {
    let conn = setup();
    let user = users::register(&conn, "asha@example.com", "secret123", "Asha", "Kumar").unwrap();
    let mut session = Session::load(&conn).unwrap();
    let rx = session.subscribe();

    session.login(&conn, user.id).unwrap();
    session.enter_demo(&conn).unwrap();
    session.logout(&conn).unwrap();

    let events: Vec<SessionEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            SessionEvent::LoggedIn { user_id: user.id },
            SessionEvent::EnteredDemo,
            SessionEvent::LoggedOut,
        ]
    );
}

#[test]
fn session_for_removed_user_is_unauthenticated() {
    let conn = setup();
    let user = users::register(&conn, "asha@example.com", "secret123", "Asha", "Kumar").unwrap();
    let mut session = Session::load(&conn).unwrap();
    session.login(&conn, user.id).unwrap();
    conn.execute("DELETE FROM users WHERE id=?1", [user.id]).unwrap();
    assert_eq!(Session::load(&conn).unwrap().state(), AppState::Unauthenticated);
}

#[test]
fn demo_command_switches_view() {
    let conn = setup();
    let mut session = Session::load(&conn).unwrap();
    run(&conn, &mut session, &["demo"]).unwrap();
    assert!(session.is_demo());
    assert_eq!(view_for(&session.state()), View::DemoDashboard);
    assert!(matches!(session.require_user(), Err(AppError::DemoReadOnly)));

    run(&conn, &mut session, &["dashboard", "summary", "--json"]).unwrap();
    run(&conn, &mut session, &["user", "logout"]).unwrap();
    assert_eq!(view_for(&session.state()), View::Login);
}
