//! Session token extraction.
//!
//! The upstream platform identifies a conversation by a long context path
//! such as
//! `projects/<agent>/agent/sessions/<token>/contexts/ongoing-order`.
//! The token between `sessions/` and `/contexts/` is the stable per-session
//! key everything else routes on.

use once_cell::sync::Lazy;
use regex::Regex;

static SESSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sessions/(.*?)/contexts/").unwrap());

/// Extract the session token from an upstream context path.
///
/// Total: a path that doesn't match the pattern yields the empty string,
/// which callers treat as a degenerate but valid session key.
pub fn extract_session_id(context_path: &str) -> String {
    SESSION_PATTERN
        .captures(context_path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
