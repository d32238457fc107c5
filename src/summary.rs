// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard totals over a user's expenses.
//!
//! The active filter is a snapshot of balance state only. It does not look
//! at the reference date; a fixed-term expense stays active until its
//! remaining months or remaining amount run out.

use crate::models::Expense;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

const MONTHS_PER_YEAR: i64 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub active_expenses: Vec<Expense>,
    pub total_monthly: Decimal,
    pub total_yearly: Decimal,
}

/// Recurring expenses are always active. Fixed-term ones need months left
/// and, when a balance is tracked, a positive balance.
pub fn is_active(e: &Expense) -> bool {
    if e.is_recurring {
        return true;
    }
    e.remaining_months > 0 && e.remaining_amount.is_none_or(|r| r > Decimal::ZERO)
}

/// Amount an active expense contributes over the next twelve months.
pub fn yearly_contribution(e: &Expense) -> Decimal {
    let months = if e.is_recurring {
        MONTHS_PER_YEAR
    } else {
        e.remaining_months.min(MONTHS_PER_YEAR)
    };
    e.amount * Decimal::from(months)
}

pub fn summarize(expenses: &[Expense], _reference_date: NaiveDate) -> Summary {
    let active_expenses: Vec<Expense> = expenses.iter().filter(|e| is_active(e)).cloned().collect();
    let total_monthly: Decimal = active_expenses.iter().map(|e| e.amount).sum();
    let total_yearly: Decimal = active_expenses.iter().map(yearly_contribution).sum();
    Summary {
        active_expenses,
        total_monthly,
        total_yearly,
    }
}
