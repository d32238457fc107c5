// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::expenses::load_expenses;
use crate::errors::AppError;
use crate::session::Session;
use crate::utils::required_arg;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(conn, session.require_user()?, sub),
        _ => Ok(()),
    }
}

fn export_expenses(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required_arg(sub, "format")?.to_lowercase();
    let out = required_arg(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        return Err(AppError::InvalidInput(format!("unknown format '{}' (use csv|json)", fmt)).into());
    }
    let data = load_expenses(conn, user_id)?;

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(&out)?;
        wtr.write_record([
            "id",
            "name",
            "amount",
            "currency",
            "type",
            "deduction_day",
            "is_recurring",
            "total_months",
            "remaining_months",
            "remaining_amount",
        ])?;
        for e in &data {
            wtr.write_record([
                e.id.to_string(),
                e.name.clone(),
                e.amount.to_string(),
                e.currency.to_string(),
                e.r#type.to_string(),
                e.deduction_day.to_string(),
                e.is_recurring.to_string(),
                e.total_months.to_string(),
                e.remaining_months.to_string(),
                e.remaining_amount.map(|r| r.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(&out, serde_json::to_string_pretty(&data)?)?;
    }
    tracing::info!(user_id, count = data.len(), format = %fmt, "expenses exported");
    println!("Exported {} expenses to {}", data.len(), out);
    Ok(())
}
