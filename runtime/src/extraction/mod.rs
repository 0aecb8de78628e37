// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! Turning rendered HTML into entity fields.
//!
//! [`fields`] evaluates declarative selector tables against markup;
//! [`script_data`] pulls playback manifests out of inline scripts.

pub mod fields;
pub mod script_data;
