// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Currency, Expense, ExpenseType};
use crate::session::Session;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, session: &mut Session) -> Result<()> {
    session.enter_demo(conn)?;
    println!("Demo mode: browsing sample data. Run `paytrack user login` to use your own.");
    Ok(())
}

fn sample(
    id: i64,
    name: &str,
    amount: i64,
    r#type: ExpenseType,
    deduction_day: u32,
    term: Option<(i64, i64)>, // (total, remaining) months
) -> Expense {
    let amount = Decimal::from(amount);
    let (is_recurring, total_months, remaining_months, remaining_amount) = match term {
        Some((total, remaining)) => (false, total, remaining, Some(amount * Decimal::from(remaining))),
        None => (true, 0, 0, None),
    };
    Expense {
        id,
        user_id: 0,
        name: name.to_string(),
        amount,
        currency: Currency::Inr,
        r#type,
        deduction_day,
        is_recurring,
        total_months,
        remaining_months,
        remaining_amount,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

/// Fixed data set shown in demo mode. Never persisted.
pub fn sample_expenses() -> Vec<Expense> {
    vec![
        sample(1, "Home Loan", 32_500, ExpenseType::Emi, 5, Some((240, 187))),
        sample(2, "Car Loan", 14_200, ExpenseType::Emi, 10, Some((60, 8))),
        sample(3, "Phone on EMI", 4_999, ExpenseType::Emi, 15, Some((12, 0))),
        sample(4, "Education Loan", 9_000, ExpenseType::PersonalLoan, 1, Some((84, 40))),
        sample(5, "From Arjun", 5_000, ExpenseType::Borrowed, 25, Some((4, 2))),
        sample(6, "Rent share", 12_000, ExpenseType::Borrowed, 1, None),
    ]
}
