//! Statistical reporting extraction

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{parse_args, Tool, ToolError};

#[derive(Debug, Deserialize)]
struct StatisticsArgs {
    text: String,
}

#[derive(Debug, Default, Serialize, PartialEq)]
struct Statistics {
    /// Largest sample size reported
    sample_size: Option<u64>,
    sample_sizes: Vec<u64>,
    p_values: Vec<String>,
    percentages: Vec<f64>,
    confidence_intervals: Vec<String>,
    effect_sizes: Vec<String>,
}

/// Pulls sample sizes, p-values, percentages, confidence intervals and effect sizes
/// out of free text
pub struct StatisticsTool {
    sample_pattern: Regex,
    population_pattern: Regex,
    p_value_pattern: Regex,
    percentage_pattern: Regex,
    ci_pattern: Regex,
    effect_pattern: Regex,
}

impl StatisticsTool {
    pub fn new() -> Self {
        Self {
            sample_pattern: Regex::new(r"\b[nN]\s*=\s*(\d[\d,]*)").unwrap(),
            population_pattern: Regex::new(
                r"(?i)\b(\d[\d,]*)\s+(?:participants|subjects|patients|respondents|students|adults|children)\b",
            )
            .unwrap(),
            p_value_pattern: Regex::new(r"\b[pP]\s*([<>=≤≥])\s*(0?\.\d+|[01](?:\.\d+)?)").unwrap(),
            percentage_pattern: Regex::new(r"(\d+(?:\.\d+)?)\s?%").unwrap(),
            ci_pattern: Regex::new(
                r"(\d{2})%\s*(?:CI|confidence interval)[,:]?\s*[\[(]?\s*(-?\d+(?:\.\d+)?)\s*(?:-|–|to|,)\s*(-?\d+(?:\.\d+)?)",
            )
            .unwrap(),
            effect_pattern: Regex::new(
                r"(?:\b(d|r|g|OR|RR|HR)|(η²|η2|R²|R2))\s*=\s*(-?\d*\.?\d+)",
            )
            .unwrap(),
        }
    }

    fn extract(&self, text: &str) -> Statistics {
        let mut stats = Statistics::default();

        let sizes = self
            .sample_pattern
            .captures_iter(text)
            .chain(self.population_pattern.captures_iter(text))
            .filter_map(|c| c.get(1))
            .filter_map(|m| m.as_str().replace(',', "").parse::<u64>().ok());
        for size in sizes {
            if !stats.sample_sizes.contains(&size) {
                stats.sample_sizes.push(size);
            }
        }
        stats.sample_size = stats.sample_sizes.iter().copied().max();

        stats.p_values = self
            .p_value_pattern
            .captures_iter(text)
            .map(|c| format!("p {} {}", &c[1], &c[2]))
            .collect();

        // Percentages that belong to a confidence level are not findings
        let ci_levels: Vec<usize> = self
            .ci_pattern
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.start()))
            .collect();

        stats.percentages = self
            .percentage_pattern
            .captures_iter(text)
            .filter(|c| c.get(1).is_some_and(|m| !ci_levels.contains(&m.start())))
            .filter_map(|c| c[1].parse::<f64>().ok())
            .collect();

        stats.confidence_intervals = self
            .ci_pattern
            .captures_iter(text)
            .map(|c| format!("{}% CI [{}, {}]", &c[1], &c[2], &c[3]))
            .collect();

        stats.effect_sizes = self
            .effect_pattern
            .captures_iter(text)
            .filter_map(|c| {
                let label = c.get(1).or_else(|| c.get(2))?;
                Some(format!("{} = {}", label.as_str(), &c[3]))
            })
            .collect();

        stats
    }
}

impl Default for StatisticsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for StatisticsTool {
    fn name(&self) -> &str {
        "extract_statistics"
    }

    fn description(&self) -> &str {
        "Extract reported statistics from a document: sample sizes, p-values, percentages, confidence intervals and effect sizes."
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Full text of the document"
                }
            },
            "required": ["text"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let args: StatisticsArgs = parse_args(args)?;
        let stats = self.extract(&args.text);
        serde_json::to_value(stats).map_err(|e| ToolError::Execution(e.to_string()))
    }
}
