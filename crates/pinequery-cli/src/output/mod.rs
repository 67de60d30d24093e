//! Output formatters

use crate::app::OutputFormat;
use anyhow::Result;
use pinequery_core::{QueryOutcome, RetrievedRecord};

/// Format a parsed query
pub fn format_outcome(outcome: &QueryOutcome, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(outcome)? + "\n",
        OutputFormat::Cli => {
            let mut output = String::new();
            output.push_str(&format!("Query:      {}\n", outcome.parsed_query));
            output.push_str(&format!("Confidence: {:.2}\n", outcome.confidence));
            if outcome.filter.is_empty() {
                output.push_str("Filter:     (none)\n");
            } else {
                output.push_str("Filter:\n");
                for (key, predicate) in outcome.filter.iter() {
                    output.push_str(&format!("  {:<16} {}\n", key, predicate));
                }
            }
            output
        }
    })
}

/// Format retrieved records
pub fn format_records(records: &[RetrievedRecord], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(records)? + "\n",
        OutputFormat::Cli => {
            let mut output = String::new();
            for (i, record) in records.iter().enumerate() {
                output.push_str(&format!("{:>2}. {}\n", i + 1, preview(record.text().unwrap_or(""), 5)));
                for (field, value) in record.fields().iter().filter(|(f, _)| *f != "text") {
                    output.push_str(&format!("    {}: {}\n", field, value));
                }
            }
            output
        }
    })
}

/// Format a RAG answer
pub fn format_answer(query: &str, answer: Option<&str>, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "query": query,
                "answer": answer.unwrap_or_default(),
            });
            serde_json::to_string_pretty(&value)? + "\n"
        }
        OutputFormat::Cli => match answer {
            Some(text) => format!("{}\n", text.trim_end()),
            None => String::new(),
        },
    })
}

fn preview(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().take(max_lines).collect();
    let mut out = lines.join("\n    ");
    if text.lines().count() > max_lines {
        out.push_str("\n    ...");
    }
    out
}
