// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Output helpers shared by CLI commands.
//!
//! Global flags are published through the environment by `main` so every
//! command sees the same mode.

use crate::error::ScrapeError;
use serde::Serialize;

pub const JSON_ENV: &str = "SERIESHUB_JSON";

/// Whether `--json` was passed.
pub fn is_json() -> bool {
    std::env::var(JSON_ENV).as_deref() == Ok("1")
}

/// Print a value to stdout: compact JSON in `--json` mode, pretty otherwise.
pub fn print_json<T: Serialize>(value: &T) {
    let rendered = if is_json() {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match rendered {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: failed to serialize output: {e}"),
    }
}

/// Machine-readable error body, matching the REST error shape.
pub fn error_body(e: &anyhow::Error) -> serde_json::Value {
    let code = e
        .downcast_ref::<ScrapeError>()
        .map(ScrapeError::code)
        .unwrap_or("E_INTERNAL");
    serde_json::json!({
        "error": { "code": code, "message": format!("{e:#}") }
    })
}
