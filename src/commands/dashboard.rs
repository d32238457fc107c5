// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{demo, expenses};
use crate::session::Session;
use crate::summary::{Summary, summarize, yearly_contribution};
use crate::utils::{format_inr, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let summary = summary_for(conn, session)?;
    match m.subcommand() {
        Some(("summary", sub)) => show_summary(&summary, sub)?,
        Some(("monthly", sub)) => show_monthly(&summary, sub)?,
        Some(("yearly", sub)) => show_yearly(&summary, sub)?,
        Some(("active", sub)) => show_active(&summary, sub)?,
        _ => show_summary(&summary, m)?,
    }
    Ok(())
}

/// Totals for whoever is looking: the logged-in user or the demo data set.
pub fn summary_for(conn: &Connection, session: &Session) -> Result<Summary> {
    let data = if session.is_demo() {
        demo::sample_expenses()
    } else {
        expenses::load_expenses(conn, session.require_user()?)?
    };
    Ok(summarize(&data, chrono::Local::now().date_naive()))
}

fn json_flags(sub: &clap::ArgMatches) -> (bool, bool) {
    // The bare `dashboard` command has no flags of its own.
    let get = |name: &str| sub.try_get_one::<bool>(name).ok().flatten().copied().unwrap_or(false);
    (get("json"), get("jsonl"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryView {
    active_count: usize,
    total_monthly: String,
    total_yearly: String,
}

fn show_summary(s: &Summary, sub: &clap::ArgMatches) -> Result<()> {
    let view = SummaryView {
        active_count: s.active_expenses.len(),
        total_monthly: format_inr(s.total_monthly),
        total_yearly: format_inr(s.total_yearly),
    };
    let (json, jsonl) = json_flags(sub);
    if !maybe_print_json(json, jsonl, &view)? {
        let rows = vec![
            vec!["Active expenses".to_string(), view.active_count.to_string()],
            vec!["Monthly outgo".to_string(), view.total_monthly],
            vec!["Yearly outgo".to_string(), view.total_yearly],
        ];
        println!("{}", pretty_table(&["", "Total"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LineView {
    name: String,
    r#type: String,
    deduction_day: u32,
    months: Option<i64>,
    amount: String,
}

fn show_monthly(s: &Summary, sub: &clap::ArgMatches) -> Result<()> {
    let lines: Vec<LineView> = s
        .active_expenses
        .iter()
        .map(|e| LineView {
            name: e.name.clone(),
            r#type: e.r#type.to_string(),
            deduction_day: e.deduction_day,
            months: None,
            amount: format_inr(e.amount),
        })
        .collect();
    let (json, jsonl) = json_flags(sub);
    if !maybe_print_json(json, jsonl, &lines)? {
        let mut rows: Vec<Vec<String>> = lines
            .into_iter()
            .map(|l| vec![l.name, l.r#type, l.deduction_day.to_string(), l.amount])
            .collect();
        rows.push(vec![
            "Total".into(),
            String::new(),
            String::new(),
            format_inr(s.total_monthly),
        ]);
        println!(
            "{}",
            pretty_table(&["Expense", "Type", "Day", "Per month"], rows)
        );
    }
    Ok(())
}

fn show_yearly(s: &Summary, sub: &clap::ArgMatches) -> Result<()> {
    let lines: Vec<LineView> = s
        .active_expenses
        .iter()
        .map(|e| LineView {
            name: e.name.clone(),
            r#type: e.r#type.to_string(),
            deduction_day: e.deduction_day,
            months: Some(if e.is_recurring { 12 } else { e.remaining_months.min(12) }),
            amount: format_inr(yearly_contribution(e)),
        })
        .collect();
    let (json, jsonl) = json_flags(sub);
    if !maybe_print_json(json, jsonl, &lines)? {
        let mut rows: Vec<Vec<String>> = lines
            .into_iter()
            .map(|l| {
                vec![
                    l.name,
                    l.r#type,
                    l.months.map(|m| m.to_string()).unwrap_or_default(),
                    l.amount,
                ]
            })
            .collect();
        rows.push(vec![
            "Total".into(),
            String::new(),
            String::new(),
            format_inr(s.total_yearly),
        ]);
        println!(
            "{}",
            pretty_table(&["Expense", "Type", "Months", "Next 12 months"], rows)
        );
    }
    Ok(())
}

fn show_active(s: &Summary, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    if !maybe_print_json(json, jsonl, &s.active_expenses)? {
        let rows = s
            .active_expenses
            .iter()
            .map(|e| {
                vec![
                    e.name.clone(),
                    e.r#type.to_string(),
                    format_inr(e.amount),
                    if e.is_recurring {
                        "Recurring".to_string()
                    } else {
                        e.remaining_months.to_string()
                    },
                    e.remaining_amount.map(format_inr).unwrap_or_else(|| "-".into()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Expense", "Type", "Per month", "Months left", "Balance"],
                rows
            )
        );
    }
    Ok(())
}
