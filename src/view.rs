// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Unauthenticated,
    Authenticated { user_id: i64 },
    Demo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
    DemoDashboard,
}

pub fn view_for(state: &AppState) -> View {
    match state {
        AppState::Unauthenticated => View::Login,
        AppState::Authenticated { .. } => View::Dashboard,
        AppState::Demo => View::DemoDashboard,
    }
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Login => "login",
            View::Dashboard => "dashboard",
            View::DemoDashboard => "demo",
        }
    }

    /// Whether `command` (with optional subcommand) is reachable from here.
    pub fn permits(&self, command: &str, sub: Option<&str>) -> bool {
        match (self, command, sub) {
            (_, "init", _) => true,
            (_, "feedback", Some("send")) => true,
            (_, "user", Some("whoami")) => true,

            (View::Login, "user", Some("register" | "login")) => true,
            (View::Login, "demo", _) => true,
            (View::Login, _, _) => false,

            (View::Dashboard, "demo", _) => false,
            (View::Dashboard, _, _) => true,

            (View::DemoDashboard, "dashboard" | "demo", _) => true,
            (View::DemoDashboard, "expense", Some("list")) => true,
            (View::DemoDashboard, "user", Some("logout")) => true,
            (View::DemoDashboard, _, _) => false,
        }
    }

    pub fn check(&self, command: &str, sub: Option<&str>) -> Result<(), AppError> {
        if self.permits(command, sub) {
            return Ok(());
        }
        Err(match self {
            View::Login => AppError::NotLoggedIn,
            View::DemoDashboard => AppError::DemoReadOnly,
            View::Dashboard => AppError::NotPermitted {
                command: command.to_string(),
                view: self.name(),
            },
        })
    }
}
