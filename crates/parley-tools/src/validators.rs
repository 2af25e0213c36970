//! Post-conversation checks on the files a team was supposed to produce.
//!
//! A missing file is an error of the check itself and propagates; an empty
//! file is a negative verdict.

use std::path::Path;

use parley_core::{Validation, ValidationResult};

use crate::files::InnovationFileTool;
use crate::session::RUN_SQL_RESULTS_FILE;

fn non_empty(path: &Path) -> ValidationResult {
    let content = std::fs::read_to_string(path)?;
    if content.is_empty() {
        Ok(Validation::failed(format!("File {} is empty", path.display())))
    } else {
        Ok(Validation::passed())
    }
}

/// The `run_sql` results file exists and has content
pub fn validate_run_sql(results_file: &Path) -> ValidationResult {
    non_empty(results_file)
}

/// Every innovation file `0..count` exists and has content
pub fn validate_innovation_files(dir: &Path, count: usize) -> ValidationResult {
    for index in 0..count {
        let verdict = non_empty(&dir.join(InnovationFileTool::file_name(index)))?;
        if !verdict.success {
            return Ok(verdict);
        }
    }
    Ok(Validation::passed())
}

/// Number of innovation files in `dir`, counting up from index 0 until the
/// first missing one
pub fn innovation_file_count(dir: &Path) -> usize {
    (0..)
        .take_while(|index| dir.join(InnovationFileTool::file_name(*index)).is_file())
        .count()
}

/// At least one innovation file was written to `dir`, and all written ones
/// have content
pub fn validate_innovation_dir(dir: &Path) -> ValidationResult {
    match innovation_file_count(dir) {
        0 => Ok(Validation::failed(format!(
            "No innovation file in {}",
            dir.display()
        ))),
        count => validate_innovation_files(dir, count),
    }
}

/// Report kinds a report team must produce, by accepted file extensions
const REPORT_KINDS: [&[&str]; 3] = [&["txt"], &["json"], &["yml", "yaml"]];

/// `dir` holds a non-empty text, JSON and YAML report.
///
/// Conversation artifacts (`agents_*` files and `run_sql` results) do not
/// count as reports.
pub fn validate_report_files(dir: &Path) -> ValidationResult {
    let mut reports = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if path.is_file() && !name.starts_with("agents_") && name != RUN_SQL_RESULTS_FILE {
            reports.push(path);
        }
    }
    reports.sort();

    for extensions in REPORT_KINDS {
        let Some(report) = reports.iter().find(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e))
        }) else {
            return Ok(Validation::failed(format!(
                "No .{} report in {}",
                extensions[0],
                dir.display()
            )));
        };
        let verdict = non_empty(report)?;
        if !verdict.success {
            return Ok(verdict);
        }
    }
    Ok(Validation::passed())
}
