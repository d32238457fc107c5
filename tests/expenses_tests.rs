// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use paytrack::commands::{self, expenses, logs};
use paytrack::config::Config;
use paytrack::errors::AppError;
use paytrack::models::{ActionKind, Currency, ExpenseType};
use paytrack::session::Session;
use paytrack::summary::is_active;
use paytrack::{cli, db};
use rusqlite::Connection;
use rust_decimal_macros::dec;

fn setup() -> (Connection, Session) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for (id, email) in [(1, "asha@example.com"), (2, "ravi@example.com")] {
        conn.execute(
            "INSERT INTO users(id,email,password_hash,first_name,last_name) VALUES (?1,?2,'x','F','L')",
            rusqlite::params![id, email],
        )
        .unwrap();
    }
    let mut session = Session::load(&conn).unwrap();
    session.login(&conn, 1).unwrap();
    (conn, session)
}

fn run(conn: &Connection, session: &mut Session, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["paytrack"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    commands::dispatch(conn, &Config::default(), session, &matches)
}

#[test]
fn add_fixed_term_defaults_balance_to_amount_times_months() {
    let (conn, mut session) = setup();
    run(
        &conn,
        &mut session,
        &[
            "expense", "add", "--name", " Car Loan ", "--amount", "1500.50", "--type",
            "Personal Loan", "--deduction-day", "7", "--months", "3",
        ],
    )
    .unwrap();

    let all = expenses::load_expenses(&conn, 1).unwrap();
    assert_eq!(all.len(), 1);
    let e = &all[0];
    assert_eq!(e.name, "Car Loan");
    assert_eq!(e.currency, Currency::Inr);
    assert_eq!(e.r#type, ExpenseType::PersonalLoan);
    assert!(!e.is_recurring);
    assert_eq!(e.total_months, 3);
    assert_eq!(e.remaining_months, 3);
    assert_eq!(e.remaining_amount, Some(dec!(4501.50)));

    let history = logs::list_logs(&conn, 1, None).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].r#type, ActionKind::Add);
}

#[test]
fn add_recurring_has_no_term_or_balance() {
    let (conn, mut session) = setup();
    run(
        &conn,
        &mut session,
        &[
            "expense", "add", "--name", "Rent share", "--amount", "12000", "--currency", "usd",
            "--type", "Borrowed", "--deduction-day", "1", "--recurring",
        ],
    )
    .unwrap();
    let e = &expenses::load_expenses(&conn, 1).unwrap()[0];
    assert!(e.is_recurring);
    assert_eq!(e.currency, Currency::Usd);
    assert_eq!(e.remaining_months, 0);
    assert_eq!(e.remaining_amount, None);
}

fn add_args(extra: &[&'static str]) -> Vec<&'static str> {
    let mut v = vec!["expense", "add", "--name", "X", "--amount"];
    v.extend_from_slice(extra);
    v
}

#[test]
fn add_rejects_bad_input() {
    let (conn, mut session) = setup();

    let err = run(&conn, &mut session, &add_args(&["0", "--deduction-day", "5", "--months", "2"]))
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidInput(_))));

    let err = run(&conn, &mut session, &add_args(&["10", "--deduction-day", "32", "--months", "2"]))
        .unwrap_err();
    assert!(err.to_string().contains("deduction day must be 1-31"));

    let err = run(&conn, &mut session, &add_args(&["10", "--deduction-day", "5"])).unwrap_err();
    assert!(err.to_string().contains("--months is required"));

    let err = run(
        &conn,
        &mut session,
        &add_args(&["10", "--deduction-day", "5", "--months", "2", "--currency", "AUD"]),
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown currency"));

    assert!(expenses::load_expenses(&conn, 1).unwrap().is_empty());
}

#[test]
fn expenses_are_owner_scoped() {
    let (conn, mut session) = setup();
    run(
        &conn,
        &mut session,
        &["expense", "add", "--name", "Mine", "--amount", "100", "--deduction-day", "3", "--months", "2"],
    )
    .unwrap();
    session.login(&conn, 2).unwrap();
    assert!(expenses::load_expenses(&conn, 2).unwrap().is_empty());

    let err = run(&conn, &mut session, &["expense", "rm", "--id", "1"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::NotFound { entity: "Expense", id: 1 })
    ));
    assert_eq!(expenses::load_expenses(&conn, 1).unwrap().len(), 1);
}

#[test]
fn edit_updates_fields_and_logs() {
    let (conn, mut session) = setup();
    run(
        &conn,
        &mut session,
        &["expense", "add", "--name", "Phone", "--amount", "999", "--deduction-day", "3", "--months", "12"],
    )
    .unwrap();
    run(
        &conn,
        &mut session,
        &[
            "expense", "edit", "--id", " 1 ", "--name", "Phone EMI", "--deduction-day", "9",
            "--remaining-amount", "5000",
        ],
    )
    .unwrap();

    let e = expenses::get_expense(&conn, 1, 1).unwrap();
    assert_eq!(e.name, "Phone EMI");
    assert_eq!(e.deduction_day, 9);
    assert_eq!(e.amount, dec!(999));
    assert_eq!(e.remaining_amount, Some(dec!(5000)));
    assert_eq!(e.remaining_months, 12);

    let history = logs::list_logs(&conn, 1, None).unwrap();
    assert_eq!(history[0].r#type, ActionKind::Update);
    assert!(history[0].details.contains("name"));
    assert!(history[0].details.contains("remaining amount"));
}

#[test]
fn rm_deletes_row_and_payments() {
    let (conn, mut session) = setup();
    run(
        &conn,
        &mut session,
        &["expense", "add", "--name", "Loan", "--amount", "100", "--deduction-day", "3", "--months", "4"],
    )
    .unwrap();
    run(&conn, &mut session, &["payment", "add", "--expense", "1", "--amount", "100"]).unwrap();
    run(&conn, &mut session, &["expense", "rm", "--id", "1"]).unwrap();

    assert!(expenses::load_expenses(&conn, 1).unwrap().is_empty());
    let payments: i64 = conn
        .query_row("SELECT COUNT(*) FROM partial_payments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(payments, 0);
    let history = logs::list_logs(&conn, 1, None).unwrap();
    assert_eq!(history[0].r#type, ActionKind::Delete);
}

#[test]
fn demo_mode_cannot_add() {
    let (conn, mut session) = setup();
    session.enter_demo(&conn).unwrap();
    let err = run(
        &conn,
        &mut session,
        &["expense", "add", "--name", "X", "--amount", "1", "--deduction-day", "3", "--months", "1"],
    )
    .unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::DemoReadOnly)));

    run(&conn, &mut session, &["expense", "list", "--json"]).unwrap();
}

#[test]
fn edit_cannot_reopen_paid_off_expense() {
    let (conn, mut session) = setup();
    run(
        &conn,
        &mut session,
        &["expense", "add", "--name", "Phone", "--amount", "500", "--deduction-day", "3", "--months", "1"],
    )
    .unwrap();
    run(&conn, &mut session, &["payment", "add", "--expense", "1", "--amount", "500"]).unwrap();
    assert!(!is_active(&expenses::get_expense(&conn, 1, 1).unwrap()));

    let err = run(
        &conn,
        &mut session,
        &["expense", "edit", "--id", "1", "--remaining-months", "5", "--remaining-amount", "500"],
    )
    .unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidInput(_))));
    assert!(err.to_string().contains("already paid off"));

    let e = expenses::get_expense(&conn, 1, 1).unwrap();
    assert!(!is_active(&e));
    assert_eq!(e.remaining_months, 0);
    assert_eq!(e.remaining_amount, Some(dec!(0)));

    // Cosmetic edits on a paid-off expense still go through.
    run(&conn, &mut session, &["expense", "edit", "--id", "1", "--name", "Old phone"]).unwrap();
    assert_eq!(expenses::get_expense(&conn, 1, 1).unwrap().name, "Old phone");
}

#[test]
fn edit_rejects_negative_counters() {
    let (conn, mut session) = setup();
    run(
        &conn,
        &mut session,
        &["expense", "add", "--name", "Loan", "--amount", "100", "--deduction-day", "3", "--months", "4"],
    )
    .unwrap();

    for arg in ["--remaining-months=-3", "--remaining-amount=-50"] {
        let err = run(&conn, &mut session, &["expense", "edit", "--id", "1", arg]).unwrap_err();
        assert!(
            matches!(err.downcast_ref::<AppError>(), Some(AppError::InvalidInput(_))),
            "{}",
            arg
        );
    }
    let e = expenses::get_expense(&conn, 1, 1).unwrap();
    assert_eq!(e.remaining_months, 4);
    assert_eq!(e.remaining_amount, Some(dec!(400)));

    // Zero is a valid way to close out the term.
    run(&conn, &mut session, &["expense", "edit", "--id", "1", "--remaining-months", "0"]).unwrap();
    assert!(!is_active(&expenses::get_expense(&conn, 1, 1).unwrap()));
}

#[test]
fn mutation_rolls_back_when_log_write_fails() {
    let (conn, mut session) = setup();
    run(
        &conn,
        &mut session,
        &["expense", "add", "--name", "Loan", "--amount", "100", "--deduction-day", "3", "--months", "4"],
    )
    .unwrap();
    conn.execute_batch("DROP TABLE action_logs").unwrap();

    assert!(run(
        &conn,
        &mut session,
        &["expense", "add", "--name", "Bike", "--amount", "50", "--deduction-day", "8", "--months", "2"],
    )
    .is_err());
    assert!(run(&conn, &mut session, &["expense", "edit", "--id", "1", "--name", "Car"]).is_err());
    assert!(run(&conn, &mut session, &["expense", "rm", "--id", "1"]).is_err());

    let all = expenses::load_expenses(&conn, 1).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Loan");
}
