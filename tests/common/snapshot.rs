//! Snapshot testing utilities using insta.
//!
//! Chat output contains ANSI color codes and wall-clock times; these filters
//! normalize both so snapshots stay stable.

#![allow(dead_code)]

/// Returns insta filter settings for normalizing chat output.
///
/// Use this with `insta::with_settings!`:
///
/// ```ignore
/// insta::with_settings!({
///     filters => chat_snapshot_filters(),
/// }, {
///     insta::assert_snapshot!(output);
/// });
/// ```
pub fn chat_snapshot_filters() -> Vec<(&'static str, &'static str)> {
    vec![
        // Strip ANSI color codes
        (r"\x1b\[[0-9;]*m", ""),
        // Normalize clock times in /history output
        (r"\d{2}:\d{2}:\d{2}", "[TIME]"),
    ]
}
