//! Extractive document summary

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::text::{content_words, split_sentences, word_count, word_frequencies};
use super::{parse_args, Tool, ToolError};

const DEFAULT_MAX_SENTENCES: usize = 3;
const MAX_SENTENCES_CAP: usize = 20;

#[derive(Debug, Deserialize)]
struct SummarizeArgs {
    text: String,
    #[serde(default)]
    max_sentences: Option<usize>,
}

/// Picks the highest-scoring sentences by content-word frequency and returns them
/// in document order
pub struct SummarizeTool;

#[async_trait]
impl Tool for SummarizeTool {
    fn name(&self) -> &str {
        "summarize_document"
    }

    fn description(&self) -> &str {
        "Summarize a document the user provided by selecting its most representative sentences."
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Full text of the document to summarize"
                },
                "max_sentences": {
                    "type": "integer",
                    "description": "Maximum number of sentences in the summary (default 3)",
                    "minimum": 1,
                    "maximum": MAX_SENTENCES_CAP
                }
            },
            "required": ["text"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let args: SummarizeArgs = parse_args(args)?;
        if args.text.trim().is_empty() {
            return Err(ToolError::InvalidArguments("text must not be empty".to_string()));
        }

        let max = args
            .max_sentences
            .unwrap_or(DEFAULT_MAX_SENTENCES)
            .clamp(1, MAX_SENTENCES_CAP);
        let sentences = split_sentences(&args.text);
        let summary = summarize(&args.text, &sentences, max);

        Ok(serde_json::json!({
            "summary": summary.join(" "),
            "sentences_selected": summary.len(),
            "sentence_count": sentences.len(),
            "word_count": word_count(&args.text),
        }))
    }
}

fn summarize(text: &str, sentences: &[String], max: usize) -> Vec<String> {
    if sentences.len() <= max {
        return sentences.to_vec();
    }

    let frequencies = word_frequencies(text);

    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let words = content_words(sentence);
            let score = if words.is_empty() {
                0.0
            } else {
                let total: usize = words
                    .iter()
                    .map(|w| frequencies.get(w).copied().unwrap_or(0))
                    .sum();
                total as f64 / words.len() as f64
            };
            (i, score)
        })
        .collect();

    // Highest score first, earlier sentence wins ties
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut chosen: Vec<usize> = scored.into_iter().take(max).map(|(i, _)| i).collect();
    chosen.sort_unstable();

    chosen.into_iter().map(|i| sentences[i].clone()).collect()
}
