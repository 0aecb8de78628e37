// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommand implementations for the SeriesHub binary.

pub mod lookup;
pub mod output;
pub mod serve;
