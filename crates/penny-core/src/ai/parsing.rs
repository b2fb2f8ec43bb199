//! Parsing helpers for AI backend responses
//!
//! Models often wrap their JSON payload in prose or code fences; these helpers
//! extract the payload before deserializing it.

use serde::Deserialize;

use crate::advisor::Insight;
use crate::categories::canonical_remote_label;
use crate::error::{Error, Result};

/// Maximum characters of a raw response quoted in error messages
const RAW_PREVIEW_LEN: usize = 200;

fn preview(raw: &str) -> String {
    if raw.chars().count() > RAW_PREVIEW_LEN {
        let cut: String = raw.chars().take(RAW_PREVIEW_LEN).collect();
        format!("{}...", cut)
    } else {
        raw.to_string()
    }
}

/// Locate the outermost JSON object in a model response
pub fn extract_json_object(response: &str) -> Result<&str> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in AI response | Raw: {}",
            preview(response)
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct InsightsPayload {
    #[serde(default)]
    insights: Vec<Insight>,
}

/// Parse budgeting insights from an AI response
pub fn parse_insights(response: &str) -> Result<Vec<Insight>> {
    let json_str = extract_json_object(response)?;
    let payload: InsightsPayload = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid insights JSON from AI: {} | Raw: {}",
            e,
            preview(json_str)
        ))
    })?;
    Ok(payload.insights)
}

/// Interpret a classification answer
///
/// Lenient mode returns the text verbatim. Strict mode resolves it against the
/// closed remote vocabulary and rejects anything else.
pub fn parse_category_label(response: &str, strict: bool) -> Result<String> {
    if !strict {
        return Ok(response.to_string());
    }

    canonical_remote_label(response)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "AI answered with a label outside the vocabulary | Raw: {}",
                preview(response)
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::InsightKind;

    #[test]
    fn test_extract_json_object_from_prose() {
        let raw = "Sure! Here you go:\n```json\n{\"insights\": []}\n```";
        assert_eq!(extract_json_object(raw).unwrap(), "{\"insights\": []}");
    }

    #[test]
    fn test_extract_json_object_missing() {
        assert!(extract_json_object("no json here").is_err());
        assert!(extract_json_object("} backwards {").is_err());
    }

    #[test]
    fn test_parse_insights() {
        let raw = r#"Here are my thoughts:
{"insights": [
  {"type": "warning", "title": "Dining is high", "message": "You spent a lot eating out.", "potential_savings": 120.5},
  {"type": "kudos", "title": "Nice", "message": "Utilities are steady."}
]}"#;
        let insights = parse_insights(raw).unwrap();
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[0].potential_savings, 120.5);
        assert_eq!(insights[1].kind, InsightKind::Kudos);
        assert_eq!(insights[1].potential_savings, 0.0);
    }

    #[test]
    fn test_parse_insights_unknown_type_is_error() {
        let raw = r#"{"insights": [{"type": "rant", "title": "x", "message": "y"}]}"#;
        assert!(parse_insights(raw).is_err());
    }

    #[test]
    fn test_parse_category_label_lenient_is_verbatim() {
        assert_eq!(parse_category_label(" Food\n", false).unwrap(), " Food\n");
        assert_eq!(
            parse_category_label("Food & Dining", false).unwrap(),
            "Food & Dining"
        );
    }

    #[test]
    fn test_parse_category_label_strict() {
        assert_eq!(parse_category_label(" food\n", true).unwrap(), "Food");
        assert!(parse_category_label("Groceries", true).is_err());
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), RAW_PREVIEW_LEN + 3);
    }
}
