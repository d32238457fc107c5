// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amortize::{PaymentDelta, PaymentInput, apply_payment};
use crate::commands::{expenses, logs};
use crate::errors::AppError;
use crate::models::{ActionKind, PartialPayment};
use crate::session::Session;
use crate::summary::is_active;
use crate::utils::{
    fmt_money, maybe_print_json, optional_arg, parse_amount, parse_date, parse_id, pretty_table,
    required_arg,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let user_id = session.require_user()?;
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user_id, sub)?,
        Some(("list", sub)) => list(conn, user_id, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let expense_id = parse_id(&required_arg(sub, "expense")?)?;
    let payment = PaymentInput {
        amount: parse_amount(&required_arg(sub, "amount")?)?,
        payment_date: match optional_arg(sub, "date") {
            Some(d) => parse_date(&d)?,
            None => chrono::Local::now().date_naive(),
        },
        description: optional_arg(sub, "description").unwrap_or_default(),
    };
    let delta = record_payment(conn, user_id, expense_id, &payment)?;
    let remaining = delta
        .remaining_amount
        .map(|r| r.round_dp(2).to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "Recorded payment of {} on {}: {} months left, {} remaining",
        payment.amount, payment.payment_date, delta.remaining_months, remaining
    );
    Ok(())
}

/// Validates, amortizes and persists one partial payment atomically.
pub fn record_payment(
    conn: &Connection,
    user_id: i64,
    expense_id: i64,
    payment: &PaymentInput,
) -> Result<PaymentDelta> {
    let expense = expenses::get_expense(conn, user_id, expense_id)?;
    if expense.is_recurring {
        return Err(AppError::PaymentRejected(format!(
            "'{}' is recurring and has no balance to pay down",
            expense.name
        ))
        .into());
    }
    if !is_active(&expense) {
        return Err(
            AppError::PaymentRejected(format!("'{}' is already paid off", expense.name)).into(),
        );
    }
    let delta = apply_payment(&expense, payment).ok_or_else(|| {
        AppError::PaymentRejected(format!("'{}' does not take payments", expense.name))
    })?;

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO partial_payments(expense_id, amount, payment_date, description)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            expense_id,
            payment.amount.to_string(),
            payment.payment_date.to_string(),
            payment.description,
        ],
    )?;
    tx.execute(
        "UPDATE expenses SET remaining_months=?1, remaining_amount=?2, updated_at=datetime('now')
         WHERE id=?3 AND user_id=?4",
        params![
            delta.remaining_months,
            delta.remaining_amount.map(|r| r.to_string()),
            expense_id,
            user_id,
        ],
    )?;
    let mut details = format!(
        "{} paid, {} months left",
        fmt_money(&payment.amount, expense.currency.as_str()),
        delta.remaining_months
    );
    if !payment.description.is_empty() {
        details.push_str(&format!(" ({})", payment.description));
    }
    logs::record(
        &tx,
        user_id,
        ActionKind::Payment,
        &format!("Payment towards '{}'", expense.name),
        &details,
    )?;
    tx.commit()?;
    tracing::info!(
        user_id,
        expense_id,
        remaining_months = delta.remaining_months,
        "partial payment applied"
    );
    Ok(delta)
}

fn list(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let expense_id = parse_id(&required_arg(sub, "expense")?)?;
    let data = payments_for(conn, user_id, expense_id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.payment_date.to_string(),
                    format!("{:.2}", p.amount),
                    p.description,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Amount", "Description"], rows)
        );
    }
    Ok(())
}

pub fn payments_for(conn: &Connection, user_id: i64, expense_id: i64) -> Result<Vec<PartialPayment>> {
    if !expenses::expense_exists(conn, user_id, expense_id)? {
        return Err(AppError::NotFound {
            entity: "Expense",
            id: expense_id,
        }
        .into());
    }
    let mut stmt = conn.prepare(
        "SELECT id, amount, payment_date, description FROM partial_payments
         WHERE expense_id=?1 ORDER BY payment_date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![expense_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, amount, date, description) = row?;
        data.push(PartialPayment {
            id,
            expense_id,
            amount: amount
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' on payment {}", amount, id))?,
            payment_date: parse_date(&date)?,
            description,
        });
    }
    Ok(data)
}
