// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn optional(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

pub fn build_cli() -> Command {
    Command::new("paytrack")
        .version(crate_version!())
        .about("Track EMIs, loans and borrowed money; see what goes out each month and year")
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(Command::new("demo").about("Explore the dashboard with sample data"))
        .subcommand(
            Command::new("user")
                .about("Register, log in and out")
                .subcommand(
                    Command::new("register")
                        .arg(required("email", "Email address"))
                        .arg(required("password", "Password (min 6 chars)"))
                        .arg(required("first-name", "First name"))
                        .arg(required("last-name", "Last name")),
                )
                .subcommand(
                    Command::new("login")
                        .arg(required("email", "Email address"))
                        .arg(required("password", "Password")),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("expense")
                .about("Manage EMIs, loans and borrowed amounts")
                .subcommand(
                    Command::new("add")
                        .arg(required("name", "What the expense is"))
                        .arg(required("amount", "Monthly amount"))
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .default_value("INR")
                                .help("INR|USD|EUR|GBP|JPY"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("EMI")
                                .help("EMI|Personal Loan|Borrowed"),
                        )
                        .arg(required("deduction-day", "Day of month it is paid (1-31)"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue)
                                .help("No fixed end; counts every month"),
                        )
                        .arg(
                            optional("months", "Number of months for a fixed-term expense")
                                .conflicts_with("recurring"),
                        )
                        .arg(
                            optional("remaining-amount", "Outstanding balance (default amount * months)")
                                .conflicts_with("recurring"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("active")
                            .long("active")
                            .action(ArgAction::SetTrue)
                            .help("Only expenses still being paid"),
                    ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(required("id", "Expense id"))
                        .arg(optional("name", "New name"))
                        .arg(optional("amount", "New monthly amount"))
                        .arg(optional("currency", "New currency"))
                        .arg(optional("type", "New type"))
                        .arg(optional("deduction-day", "New deduction day"))
                        .arg(optional("remaining-months", "Override remaining months"))
                        .arg(optional("remaining-amount", "Override remaining amount")),
                )
                .subcommand(Command::new("rm").arg(required("id", "Expense id"))),
        )
        .subcommand(
            Command::new("payment")
                .about("Record partial payments against fixed-term expenses")
                .subcommand(
                    Command::new("add")
                        .arg(required("expense", "Expense id"))
                        .arg(required("amount", "Amount paid"))
                        .arg(optional("date", "Payment date YYYY-MM-DD (default today)"))
                        .arg(optional("description", "Note for this payment")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(required("expense", "Expense id")),
                )),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Monthly and yearly outgoings")
                .subcommand(json_flags(Command::new("summary")))
                .subcommand(json_flags(Command::new("monthly")))
                .subcommand(json_flags(Command::new("yearly")))
                .subcommand(json_flags(Command::new("active"))),
        )
        .subcommand(
            Command::new("log")
                .about("Activity history")
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(Command::new("rm").arg(required("id", "Log entry id")))
                .subcommand(Command::new("clear")),
        )
        .subcommand(
            Command::new("feedback")
                .about("Send feedback to the maintainers")
                .subcommand(
                    Command::new("send")
                        .arg(required("message", "Your feedback"))
                        .arg(optional("email", "Reply-to address")),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("expenses")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(required("out", "Output file")),
            ),
        )
        .subcommand(Command::new("doctor").about("Check data for inconsistencies"))
}
