// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::expenses::load_expenses;
use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, session: &Session) -> Result<()> {
    let rows = find_issues(conn, session.require_user()?)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn find_issues(conn: &Connection, user_id: i64) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    for e in load_expenses(conn, user_id)? {
        if e.is_recurring {
            continue;
        }
        // Final payment larger than the balance
        if let Some(r) = e.remaining_amount.filter(|r| *r < Decimal::ZERO) {
            rows.push(vec!["overpaid".into(), format!("{} ({} over)", e.name, -r)]);
        }
        // Term ran out with money still owed
        if let Some(r) = e.remaining_amount.filter(|r| *r > Decimal::ZERO && e.remaining_months == 0) {
            rows.push(vec![
                "balance_left".into(),
                format!("{} ({} owed after last month)", e.name, r),
            ]);
        }
        if e.remaining_months > e.total_months {
            rows.push(vec![
                "term_overrun".into(),
                format!("{} ({} of {} months left)", e.name, e.remaining_months, e.total_months),
            ]);
        }
    }
    Ok(rows)
}
