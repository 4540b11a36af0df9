//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, ValluArgs};
use crate::engine::ResolutionKind;
use crate::error::Result;
use crate::query::PresetQuestion;
use crate::vector::loader::SkippedRow;

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchCommandResult {
    pub query: String,
    pub kind: ResolutionKind,
    pub ids: Vec<i64>,
    pub records_loaded: usize,
    pub duration_ms: u64,
}

/// Corpus statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreStats {
    pub rows_path: String,
    pub rows_read: usize,
    pub records_loaded: usize,
    pub rows_skipped: usize,
    pub dimension: Option<usize>,
    pub loaded_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<Vec<SkippedRow>>,
}

/// Result structure for blob decoding.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecodeResult {
    pub dimension: usize,
    pub values: Vec<f32>,
}

/// Result structure for related items.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelatedResult {
    pub id: i64,
    pub related: Vec<i64>,
}

/// Preset listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct PresetListing {
    pub presets: Vec<PresetQuestion>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &ValluArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &ValluArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;

    if let Some(presets) = value.get("presets").and_then(|p| p.as_array()) {
        output_presets_human(presets);
        return Ok(());
    }

    output_generic_human(&value);
    Ok(())
}

/// Output preset questions grouped by category.
fn output_presets_human(presets: &[serde_json::Value]) {
    let mut current_category = "";
    for preset in presets {
        let category = preset
            .get("category")
            .and_then(|c| c.as_str())
            .unwrap_or("unknown");
        if category != current_category {
            if !current_category.is_empty() {
                println!();
            }
            println!("{category}");
            println!("{}", "─".repeat(category.chars().count()));
            current_category = category;
        }

        let question = preset.get("question").and_then(|q| q.as_str()).unwrap_or("");
        let ids = preset
            .get("ids")
            .map(format_value)
            .unwrap_or_else(|| "[]".to_string());
        println!("  {question} {ids}");
    }
}

/// Generic output for other types.
fn output_generic_human(value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &ValluArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human output.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(obj) => {
            let formatted_values = obj
                .iter()
                .map(|(k, v)| format!("{k}={}", format_value(v)))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{{formatted_values}}}")
        }
        serde_json::Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("text")), "text");
        assert_eq!(format_value(&json!([1, 2, 3])), "[1, 2, 3]");
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(
            format_value(&json!({"id": 3, "reason": {"reason": "missing_embedding"}})),
            "{id=3 reason={reason=missing_embedding}}"
        );
    }

    #[test]
    fn test_search_result_serializes_kind() {
        let result = SearchCommandResult {
            query: "42".to_string(),
            kind: ResolutionKind::Id,
            ids: vec![42],
            records_loaded: 0,
            duration_ms: 1,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["kind"], "id");
        assert_eq!(value["ids"], json!([42]));
    }
}
