//! Read/write evaluation JSON files.
//!
//! A saved evaluation carries its inputs and the reference data it used, so
//! `crianza show` can re-render it without touching the network.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::pipeline::Evaluation;
use crate::error::AppError;

const TOOL: &str = "crianza";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationFile {
    pub tool: String,
    pub version: String,
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

pub fn write_evaluation_json(path: &Path, evaluation: &Evaluation) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create evaluation JSON '{}': {e}", path.display())))?;

    let saved = EvaluationFile {
        tool: TOOL.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        evaluation: evaluation.clone(),
    };
    serde_json::to_writer_pretty(file, &saved)
        .map_err(|e| AppError::io(format!("Failed to write evaluation JSON: {e}")))?;

    info!(path = %path.display(), "evaluation JSON written");
    Ok(())
}

pub fn read_evaluation_json(path: &Path) -> Result<Evaluation, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open evaluation JSON '{}': {e}", path.display())))?;
    let saved: EvaluationFile = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| AppError::io(format!("Invalid evaluation JSON: {e}")))?;
    if saved.tool != TOOL {
        return Err(AppError::io(format!(
            "'{}' was written by '{}', not {TOOL}.",
            path.display(),
            saved.tool
        )));
    }
    Ok(saved.evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::compute_household;
    use crate::domain::{CostParams, WagePair};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("crianza-{}-{name}", std::process::id()))
    }

    #[test]
    fn saved_evaluation_reads_back() {
        let wages = WagePair {
            hourly: 3_000.0,
            monthly: 366_000.0,
        };
        let household = compute_household(&[3.0], 306_000.0, &wages, &CostParams::default());
        let eval = Evaluation {
            ages: vec![3.0],
            params: CostParams::default(),
            price_level: 306_000.0,
            price_period: None,
            wages,
            full_time_rate: wages.full_time_rate(),
            household,
            comparison: None,
        };

        let path = temp_path("eval.json");
        write_evaluation_json(&path, &eval).unwrap();
        let back = read_evaluation_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.ages, vec![3.0]);
        assert_eq!(back.household.total, eval.household.total);
        assert_eq!(back.wages, wages);
    }

    #[test]
    fn foreign_json_is_rejected() {
        let path = temp_path("other.json");
        std::fs::write(&path, r#"{"tool":"spreadsheet-export","rows":[]}"#).unwrap();
        let err = read_evaluation_json(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
