//! Response extraction: recover a JSON action array from backend text.
//!
//! Generation backends promise nothing about structure. The same model that
//! returns a bare JSON array one call will wrap it in a code fence the next,
//! prepend "Sure! Here is the JSON:", leave a trailing comma, or answer in
//! prose. Recovery is purely syntactic: elements are tagged with their kind
//! but payloads pass through untouched; the executor owns all semantic
//! validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use tracing::debug;

use jot_core::{Action, Error, Result};

/// Conversational prefixes models put in front of the array, applied once
/// each, in order, anchored at the start.
static PREFIX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^here (?:is|are) (?:the )?(?:json|actions?)(?:\s*:)?\s*",
        r"(?i)^the (?:json|actions?)(?:\s*:)?\s*",
        r"(?i)^```(?:json)?\s*",
        r"(?i)^sure[.!]?\s*",
        r"(?i)^certainly[.!]?\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid prefix pattern"))
    .collect()
});

/// A closing code fence at the very end of the text.
static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```\s*$").expect("valid fence pattern"));

/// A fenced block anywhere in the text, inner contents captured.
static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("valid block pattern"));

/// A comma directly before a closing bracket or brace.
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("valid comma pattern"));

/// Recover a sequence of actions from raw backend text.
///
/// Recovery attempts, short-circuiting on the first success:
/// 1. strip known prefixes and a trailing closing fence, parse directly
/// 2. parse the contents of a fenced block, then with trailing commas removed
/// 3. parse the first-`[`-to-last-`]` slice, then with trailing commas removed
/// 4. parse the whole cleaned text with trailing commas removed
///
/// Only a top-level JSON array is accepted; `[]` means "no actions". Fails
/// with [`Error::MalformedResponse`] when every attempt comes up empty.
pub fn extract_actions(raw: &str) -> Result<Vec<Action>> {
    let mut cleaned = raw.trim().to_string();
    for pattern in PREFIX_PATTERNS.iter() {
        cleaned = pattern.replace(&cleaned, "").trim().to_string();
    }
    cleaned = CLOSING_FENCE.replace(&cleaned, "").trim().to_string();

    if let Some(actions) = try_parse_array(&cleaned) {
        debug!(stage = "direct", count = actions.len(), "Recovered action array");
        return Ok(actions);
    }

    if let Some(captures) = FENCED_BLOCK.captures(&cleaned) {
        let inner = captures[1].trim().to_string();
        if let Some(actions) = try_parse_array(&inner) {
            debug!(stage = "fenced", count = actions.len(), "Recovered action array");
            return Ok(actions);
        }
        if let Some(actions) = try_parse_array(&repair_trailing_commas(&inner)) {
            debug!(
                stage = "fenced_repaired",
                count = actions.len(),
                "Recovered action array"
            );
            return Ok(actions);
        }
    }

    if let (Some(start), Some(end)) = (cleaned.find('['), cleaned.rfind(']')) {
        if start < end {
            let slice = &cleaned[start..=end];
            if let Some(actions) = try_parse_array(slice) {
                debug!(stage = "bracket", count = actions.len(), "Recovered action array");
                return Ok(actions);
            }
            if let Some(actions) = try_parse_array(&repair_trailing_commas(slice)) {
                debug!(
                    stage = "bracket_repaired",
                    count = actions.len(),
                    "Recovered action array"
                );
                return Ok(actions);
            }
        }
    }

    if let Some(actions) = try_parse_array(&repair_trailing_commas(&cleaned)) {
        debug!(stage = "repaired", count = actions.len(), "Recovered action array");
        return Ok(actions);
    }

    Err(Error::MalformedResponse(
        "response did not contain a valid JSON array of actions".to_string(),
    ))
}

/// Parse text as a JSON array of actions. Anything that is valid JSON but
/// not an array is rejected; array elements are converted totally (unknown
/// shapes become unrecognized actions rather than parse failures).
fn try_parse_array(text: &str) -> Option<Vec<Action>> {
    match serde_json::from_str::<JsonValue>(text) {
        Ok(JsonValue::Array(items)) => Some(items.into_iter().map(Action::from_value).collect()),
        _ => None,
    }
}

/// Remove commas that directly precede a closing `]` or `}`.
fn repair_trailing_commas(text: &str) -> String {
    TRAILING_COMMA.replace_all(text, "$1").to_string()
}
