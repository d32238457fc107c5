// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Domain failures that callers (and tests) may want to match on.
/// Everything else travels as a plain `anyhow::Error` with context.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not logged in; run `paytrack user login` or `paytrack demo` first")]
    NotLoggedIn,

    #[error("'{command}' is not available from the {view} view")]
    NotPermitted { command: String, view: &'static str },

    #[error("Demo mode is read-only; log in to make changes")]
    DemoReadOnly,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Payment rejected: {0}")]
    PaymentRejected(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
