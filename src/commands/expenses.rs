// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{demo, logs};
use crate::errors::AppError;
use crate::models::{ActionKind, Currency, Expense, ExpenseType};
use crate::session::Session;
use crate::summary::is_active;
use crate::utils::{
    fmt_money, maybe_print_json, optional_arg, parse_amount, parse_decimal, parse_id,
    pretty_table, required_arg,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

const EXPENSE_COLUMNS: &str = "id, user_id, name, amount, currency, type, deduction_day, \
     is_recurring, total_months, remaining_months, remaining_amount, created_at, updated_at";

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let expenses = if session.is_demo() {
                demo::sample_expenses()
            } else {
                load_expenses(conn, session.require_user()?)?
            };
            list(expenses, sub)?
        }
        Some(("add", sub)) => add(conn, session.require_user()?, sub)?,
        Some(("edit", sub)) => edit(conn, session.require_user()?, sub)?,
        Some(("rm", sub)) => remove(conn, session.require_user()?, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_deduction_day(s: &str) -> Result<u32> {
    let day = s
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid deduction day '{}'", s.trim()))?;
    if !(1..=31).contains(&day) {
        return Err(AppError::InvalidInput(format!("deduction day must be 1-31, got {}", day)).into());
    }
    Ok(day)
}

fn parse_months(s: &str, name: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid {} '{}'", name, s.trim()))
}

fn parse_remaining_months(s: &str) -> Result<i64> {
    let months = parse_months(s, "remaining months")?;
    if months < 0 {
        return Err(AppError::InvalidInput("remaining months must not be negative".into()).into());
    }
    Ok(months)
}

fn parse_remaining_amount(s: &str) -> Result<Decimal> {
    let r = parse_decimal(s)?;
    if r < Decimal::ZERO {
        return Err(AppError::InvalidInput("remaining amount must not be negative".into()).into());
    }
    Ok(r)
}

fn add(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let name = required_arg(sub, "name")?;
    if name.is_empty() {
        return Err(AppError::InvalidInput("name must not be empty".into()).into());
    }
    let amount = parse_amount(&required_arg(sub, "amount")?)?;
    let currency: Currency = required_arg(sub, "currency")?.parse()?;
    let typ: ExpenseType = required_arg(sub, "type")?.parse()?;
    let deduction_day = parse_deduction_day(&required_arg(sub, "deduction-day")?)?;
    let is_recurring = sub.get_flag("recurring");

    let (total_months, remaining_amount) = if is_recurring {
        (0, None)
    } else {
        let months = optional_arg(sub, "months")
            .context("--months is required unless --recurring is set")?;
        let months = parse_months(&months, "months")?;
        if months < 1 {
            return Err(AppError::InvalidInput("months must be at least 1".into()).into());
        }
        let remaining = match optional_arg(sub, "remaining-amount") {
            Some(s) => parse_remaining_amount(&s)?,
            None => amount * Decimal::from(months),
        };
        (months, Some(remaining))
    };

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO expenses(user_id, name, amount, currency, type, deduction_day, is_recurring,
                              total_months, remaining_months, remaining_amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8, ?9)",
        params![
            user_id,
            name,
            amount.to_string(),
            currency.as_str(),
            typ.as_str(),
            deduction_day,
            is_recurring,
            total_months,
            remaining_amount.map(|r| r.to_string()),
        ],
    )?;
    let id = tx.last_insert_rowid();
    logs::record(
        &tx,
        user_id,
        ActionKind::Add,
        &format!("Added {} '{}'", typ, name),
        &format!(
            "{} per month, {}",
            fmt_money(&amount, currency.as_str()),
            schedule(is_recurring, total_months, total_months)
        ),
    )?;
    tx.commit()?;
    tracing::info!(user_id, expense_id = id, "expense added");
    println!(
        "Added expense {} '{}' ({}, {})",
        id,
        name,
        typ,
        fmt_money(&amount, currency.as_str())
    );
    Ok(())
}

fn edit(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(&required_arg(sub, "id")?)?;
    let before = get_expense(conn, user_id, id)?;
    let mut e = before.clone();
    let mut changed = Vec::new();

    if let Some(name) = optional_arg(sub, "name") {
        e.name = name;
        changed.push("name");
    }
    if let Some(amount) = optional_arg(sub, "amount") {
        e.amount = parse_amount(&amount)?;
        changed.push("amount");
    }
    if let Some(ccy) = optional_arg(sub, "currency") {
        e.currency = ccy.parse()?;
        changed.push("currency");
    }
    if let Some(typ) = optional_arg(sub, "type") {
        e.r#type = typ.parse()?;
        changed.push("type");
    }
    if let Some(day) = optional_arg(sub, "deduction-day") {
        e.deduction_day = parse_deduction_day(&day)?;
        changed.push("deduction day");
    }
    if let Some(months) = optional_arg(sub, "remaining-months") {
        e.remaining_months = parse_remaining_months(&months)?;
        changed.push("remaining months");
    }
    if let Some(rem) = optional_arg(sub, "remaining-amount") {
        e.remaining_amount = Some(parse_remaining_amount(&rem)?);
        changed.push("remaining amount");
    }
    if changed.is_empty() {
        println!("Nothing to change for expense {}", id);
        return Ok(());
    }
    // Paid-off is terminal.
    if !is_active(&before) && is_active(&e) {
        return Err(AppError::InvalidInput(format!(
            "'{}' is already paid off and cannot be reopened",
            before.name
        ))
        .into());
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE expenses SET name=?1, amount=?2, currency=?3, type=?4, deduction_day=?5,
                remaining_months=?6, remaining_amount=?7, updated_at=datetime('now')
         WHERE id=?8 AND user_id=?9",
        params![
            e.name,
            e.amount.to_string(),
            e.currency.as_str(),
            e.r#type.as_str(),
            e.deduction_day,
            e.remaining_months,
            e.remaining_amount.map(|r| r.to_string()),
            id,
            user_id,
        ],
    )?;
    let details = format!("Changed {}", changed.join(", "));
    logs::record(&tx, user_id, ActionKind::Update, &format!("Updated '{}'", e.name), &details)?;
    tx.commit()?;
    tracing::info!(user_id, expense_id = id, "expense updated");
    println!("Updated expense {}: {}", id, details.to_lowercase());
    Ok(())
}

fn remove(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(&required_arg(sub, "id")?)?;
    let e = get_expense(conn, user_id, id)?;
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM expenses WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    logs::record(
        &tx,
        user_id,
        ActionKind::Delete,
        &format!("Deleted '{}'", e.name),
        &format!("{} {}", e.r#type, fmt_money(&e.amount, e.currency.as_str())),
    )?;
    tx.commit()?;
    tracing::info!(user_id, expense_id = id, "expense deleted");
    println!("Removed expense {} '{}'", id, e.name);
    Ok(())
}

fn list(expenses: Vec<Expense>, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<Expense> = if sub.get_flag("active") {
        expenses.into_iter().filter(is_active).collect()
    } else {
        expenses
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.name.clone(),
                    e.r#type.to_string(),
                    fmt_money(&e.amount, e.currency.as_str()),
                    e.deduction_day.to_string(),
                    schedule(e.is_recurring, e.remaining_months, e.total_months),
                    e.remaining_amount
                        .map(|r| fmt_money(&r, e.currency.as_str()))
                        .unwrap_or_else(|| "-".into()),
                    if is_active(e) { "Active" } else { "Paid off" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Type", "Amount", "Day", "Schedule", "Remaining", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

fn schedule(is_recurring: bool, remaining_months: i64, total_months: i64) -> String {
    if is_recurring {
        "Recurring".to_string()
    } else {
        format!("{}/{} months left", remaining_months, total_months)
    }
}

fn expense_from_row(r: &Row) -> Result<Expense> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(3)?;
    let currency: String = r.get(4)?;
    let typ: String = r.get(5)?;
    let remaining: Option<String> = r.get(10)?;
    Ok(Expense {
        id,
        user_id: r.get(1)?,
        name: r.get(2)?,
        amount: amount
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' on expense {}", amount, id))?,
        currency: currency.parse()?,
        r#type: typ.parse()?,
        deduction_day: r.get(6)?,
        is_recurring: r.get(7)?,
        total_months: r.get(8)?,
        remaining_months: r.get(9)?,
        remaining_amount: remaining
            .map(|s| {
                s.parse::<Decimal>()
                    .with_context(|| format!("Invalid remaining amount '{}' on expense {}", s, id))
            })
            .transpose()?,
        created_at: r.get(11)?,
        updated_at: r.get(12)?,
    })
}

pub fn load_expenses(conn: &Connection, user_id: i64) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expenses WHERE user_id=?1 ORDER BY deduction_day, id",
        EXPENSE_COLUMNS
    ))?;
    let mut rows = stmt.query(params![user_id])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(expense_from_row(r)?);
    }
    Ok(data)
}

pub fn get_expense(conn: &Connection, user_id: i64, id: i64) -> Result<Expense> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expenses WHERE id=?1 AND user_id=?2",
        EXPENSE_COLUMNS
    ))?;
    let mut rows = stmt.query(params![id, user_id])?;
    match rows.next()? {
        Some(r) => expense_from_row(r),
        None => Err(AppError::NotFound {
            entity: "Expense",
            id,
        }
        .into()),
    }
}

pub fn expense_exists(conn: &Connection, user_id: i64, id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM expenses WHERE id=?1 AND user_id=?2",
            params![id, user_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}
