//! Projection of backend analysis payloads into the fixed result shape

use serde_json::Value;

use crate::model::{BackendAnalysis, FullResult, NormalizedAnalysisResult};

const DEFAULT_METHODS: &str = "No methodology information extracted";
const DEFAULT_KEY_STATISTICS: &str = "No statistical data extracted";
const DEFAULT_CONCLUSIONS: &str = "No conclusions extracted from the paper";
const DEFAULT_QUOTE: &str = "No quotes extracted from the paper";
const DEFAULT_SUGGESTED_TEXT: &str = "Analysis completed successfully";
const DEFAULT_RELIABILITY_SCORE: f64 = 0.7;
const DEFAULT_RELEVANCE_SCORE: f64 = 0.8;

/// Separator used when the backend reports a text field as a list
const LIST_SEPARATOR: &str = "; ";

/// Coerce a loosely typed payload field into text; blank or unusable values are absent
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(|item| text(Some(item))).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(LIST_SEPARATOR))
            }
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// Coerce a loosely typed score: numbers as-is, numeric strings parsed
fn score(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn present_value(value: Option<Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        other => other,
    }
}

/// Clamp a score into [0, 1], substituting the default when absent
pub fn clamp_score(score: Option<f64>, default: f64) -> f64 {
    match score {
        Some(s) if s.is_finite() => s.clamp(0.0, 1.0),
        _ => default,
    }
}

fn quotes(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => vec![DEFAULT_QUOTE.to_string()],
    }
}

/// Map a completed job's payload onto the result shape, filling defaults
pub fn normalize(raw: BackendAnalysis) -> NormalizedAnalysisResult {
    let conclusions = text(raw.conclusions);
    let suggested = text(raw.suggested_text).or_else(|| conclusions.clone());

    NormalizedAnalysisResult {
        methods: text(raw.methods).unwrap_or_else(|| DEFAULT_METHODS.to_string()),
        sample_size: present_value(raw.sample_size),
        key_statistics: present_value(raw.key_statistics)
            .or_else(|| present_value(raw.numerical_data))
            .unwrap_or_else(|| Value::String(DEFAULT_KEY_STATISTICS.to_string())),
        conclusions: conclusions.unwrap_or_else(|| DEFAULT_CONCLUSIONS.to_string()),
        important_quotes: quotes(raw.important_quotes),
        reliability_score: clamp_score(score(raw.reliability_score), DEFAULT_RELIABILITY_SCORE),
        relevance_score: clamp_score(score(raw.relevance_score), DEFAULT_RELEVANCE_SCORE),
        suggested_text: suggested
            .clone()
            .unwrap_or_else(|| DEFAULT_SUGGESTED_TEXT.to_string()),
        error: None,
        full_result: FullResult {
            suggested_text: suggested,
        },
    }
}

/// Placeholder result carrying a pipeline failure, so the UI can still render a panel
pub fn degraded(error: impl Into<String>) -> NormalizedAnalysisResult {
    NormalizedAnalysisResult {
        methods: "Analysis failed due to technical error".to_string(),
        sample_size: None,
        key_statistics: Value::String("Unable to extract statistics".to_string()),
        conclusions: "Analysis could not be completed. Please try again.".to_string(),
        important_quotes: vec!["Technical error prevented analysis".to_string()],
        reliability_score: 0.0,
        relevance_score: 0.0,
        suggested_text: "Analysis unavailable due to system error".to_string(),
        error: Some(error.into()),
        full_result: FullResult {
            suggested_text: Some(
                "Please try again or contact support if the issue persists".to_string(),
            ),
        },
    }
}
