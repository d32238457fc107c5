// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Expense;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub description: String,
}

/// New counter values after a payment. Persisting them is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDelta {
    pub remaining_months: i64,
    pub remaining_amount: Option<Decimal>,
}

/// Applies a partial payment to a fixed-term expense.
///
/// Any payment consumes exactly one month of term, whatever its size, and
/// reduces the remaining amount by the payment. Neither counter is clamped:
/// an overpayment leaves a negative balance, which the active filter treats
/// as exhausted. An expense without a tracked balance keeps `None`.
///
/// Recurring expenses have no term to consume, so they yield `None`.
pub fn apply_payment(expense: &Expense, payment: &PaymentInput) -> Option<PaymentDelta> {
    if expense.is_recurring {
        return None;
    }
    Some(PaymentDelta {
        remaining_months: expense.remaining_months - 1,
        remaining_amount: expense.remaining_amount.map(|r| r - payment.amount),
    })
}
