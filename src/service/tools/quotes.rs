//! Key quote extraction

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::text::split_sentences;
use super::{parse_args, Tool, ToolError};

const DEFAULT_MAX_QUOTES: usize = 5;
const DEFAULT_MIN_LENGTH: usize = 40;
const MAX_QUOTE_CHARS: usize = 400;

/// Phrases that typically introduce a finding or conclusion
const FINDING_MARKERS: &[&str] = &[
    "we found",
    "we show",
    "we demonstrate",
    "results show",
    "results indicate",
    "results suggest",
    "our findings",
    "findings suggest",
    "in conclusion",
    "we conclude",
    "significantly",
    "evidence that",
    "demonstrates that",
    "suggests that",
];

#[derive(Debug, Deserialize)]
struct QuoteArgs {
    text: String,
    #[serde(default)]
    max_quotes: Option<usize>,
    #[serde(default)]
    min_length: Option<usize>,
}

/// Returns direct quotations first, then sentences carrying finding markers
pub struct KeyQuotesTool {
    quoted_passage: Regex,
}

impl KeyQuotesTool {
    pub fn new() -> Self {
        Self {
            quoted_passage: Regex::new(r#""([^"]+)"|“([^”]+)”"#).unwrap(),
        }
    }

    fn find_quotes(&self, text: &str, max: usize, min_length: usize) -> Vec<String> {
        let mut quotes: Vec<String> = Vec::new();
        let fits = |q: &str| {
            let len = q.chars().count();
            len >= min_length && len <= MAX_QUOTE_CHARS
        };

        for caps in self.quoted_passage.captures_iter(text) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                let quote = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
                if fits(&quote) && !quotes.contains(&quote) {
                    quotes.push(quote);
                }
            }
        }

        for sentence in split_sentences(text) {
            if quotes.len() >= max {
                break;
            }
            let lower = sentence.to_lowercase();
            let is_finding = FINDING_MARKERS.iter().any(|m| lower.contains(m));
            let already_quoted = quotes.iter().any(|q| sentence.contains(q.as_str()));
            if is_finding && !already_quoted && fits(&sentence) {
                quotes.push(sentence);
            }
        }

        quotes.truncate(max);
        quotes
    }
}

impl Default for KeyQuotesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for KeyQuotesTool {
    fn name(&self) -> &str {
        "extract_key_quotes"
    }

    fn description(&self) -> &str {
        "Find the most quotable passages in a document: direct quotations and sentences stating findings or conclusions."
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Full text of the document"
                },
                "max_quotes": {
                    "type": "integer",
                    "description": "Maximum number of quotes to return (default 5)",
                    "minimum": 1
                },
                "min_length": {
                    "type": "integer",
                    "description": "Minimum quote length in characters (default 40)",
                    "minimum": 0
                }
            },
            "required": ["text"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let args: QuoteArgs = parse_args(args)?;
        if args.text.trim().is_empty() {
            return Err(ToolError::InvalidArguments("text must not be empty".to_string()));
        }

        let max = args.max_quotes.unwrap_or(DEFAULT_MAX_QUOTES).max(1);
        let min_length = args.min_length.unwrap_or(DEFAULT_MIN_LENGTH);
        let quotes = self.find_quotes(&args.text, max, min_length);

        Ok(serde_json::json!({
            "quotes": quotes,
            "count": quotes.len(),
        }))
    }
}
