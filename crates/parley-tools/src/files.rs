//! File-writing tools for the report team.
//!
//! Every tool writes inside a single output directory. A caller-supplied
//! `fname` only contributes its final path component; without one the tool
//! falls back to its default file name.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parley_core::{Arguments, Tool, ToolError, ToolResult};
use serde_json::Value;
use tracing::{info, warn};

fn schema(content_key: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "fname": {
                "type": "string",
                "description": "The name of the file to write"
            },
            content_key: {
                "type": "string",
                "description": "The content of the file to write"
            }
        },
        "required": [content_key]
    })
}

fn required<'a>(tool: &str, arguments: &'a Arguments, key: &str) -> ToolResult<&'a str> {
    arguments
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| ToolError::missing_argument(tool, key))
}

/// Resolve the target path for a write inside `dir`.
fn target(dir: &Path, fname: Option<&String>, default: &str) -> PathBuf {
    let name = fname
        .and_then(|f| Path::new(f).file_name())
        .map(|n| n.to_owned())
        .unwrap_or_else(|| default.into());
    dir.join(name)
}

fn write(tool: &str, path: &Path, content: &str) -> ToolResult<()> {
    std::fs::write(path, content).map_err(|e| ToolError::io(tool, e))?;
    info!(tool, path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}

/// Model output tends to quote JSON with single quotes.
fn normalize_quotes(raw: &str) -> String {
    raw.replace('\'', "\"")
}

/// `write_file`: writes `content` verbatim.
#[derive(Debug, Clone)]
pub struct WriteFileTool {
    dir: PathBuf,
}

impl WriteFileTool {
    pub const NAME: &'static str = "write_file";
    pub const DEFAULT_FILE: &'static str = "write_file.txt";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Write a file to the filesystem"
    }

    fn input_schema(&self) -> Option<Value> {
        Some(schema("content"))
    }

    fn invoke(&self, arguments: &Arguments) -> ToolResult<String> {
        let content = required(Self::NAME, arguments, "content")?;
        let path = target(&self.dir, arguments.get("fname"), Self::DEFAULT_FILE);
        write(Self::NAME, &path, content)?;
        Ok(format!("Successfully wrote file {}", path.display()))
    }
}

/// `write_json_file`: parses `json_str` and writes it pretty-printed.
///
/// Unparseable input is reported back as a status string and nothing is
/// written.
#[derive(Debug, Clone)]
pub struct WriteJsonFileTool {
    dir: PathBuf,
}

impl WriteJsonFileTool {
    pub const NAME: &'static str = "write_json_file";
    pub const DEFAULT_FILE: &'static str = "write_json_file.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Tool for WriteJsonFileTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Write a json file to the filesystem"
    }

    fn input_schema(&self) -> Option<Value> {
        Some(schema("json_str"))
    }

    fn invoke(&self, arguments: &Arguments) -> ToolResult<String> {
        let raw = required(Self::NAME, arguments, "json_str")?;
        let data: Value = match serde_json::from_str(&normalize_quotes(raw)) {
            Ok(data) => data,
            Err(e) => {
                warn!(tool = Self::NAME, error = %e, "Rejected malformed JSON");
                return Ok(format!("Error decoding JSON: {e}"));
            }
        };

        let pretty = serde_json::to_string_pretty(&data)
            .map_err(|e| ToolError::execution_failed(Self::NAME, e.to_string()))?;
        let path = target(&self.dir, arguments.get("fname"), Self::DEFAULT_FILE);
        write(Self::NAME, &path, &pretty)?;
        Ok(format!("Successfully wrote json file {}", path.display()))
    }
}

/// `write_yml_file`: parses `json_str` as YAML and re-emits it.
#[derive(Debug, Clone)]
pub struct WriteYamlFileTool {
    dir: PathBuf,
}

impl WriteYamlFileTool {
    pub const NAME: &'static str = "write_yml_file";
    pub const DEFAULT_FILE: &'static str = "write_yml_file.yml";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Tool for WriteYamlFileTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Write a yaml file to the filesystem"
    }

    fn input_schema(&self) -> Option<Value> {
        Some(schema("json_str"))
    }

    fn invoke(&self, arguments: &Arguments) -> ToolResult<String> {
        let raw = required(Self::NAME, arguments, "json_str")?;
        let data: serde_yaml::Value = match serde_yaml::from_str(&normalize_quotes(raw)) {
            Ok(data) => data,
            Err(e) => {
                warn!(tool = Self::NAME, error = %e, "Rejected malformed YAML");
                return Ok(format!("Error decoding YAML: {e}"));
            }
        };

        let yaml = serde_yaml::to_string(&data)
            .map_err(|e| ToolError::execution_failed(Self::NAME, e.to_string()))?;
        let path = target(&self.dir, arguments.get("fname"), Self::DEFAULT_FILE);
        write(Self::NAME, &path, &yaml)?;
        Ok(format!("Successfully wrote yml file {}", path.display()))
    }
}

/// `write_innovation_file`: writes `{n}_innovation_file.json` with `n`
/// counting up from zero.
///
/// Clones share the counter, so the validator can learn how many files
/// were written.
#[derive(Debug, Clone)]
pub struct InnovationFileTool {
    dir: PathBuf,
    written: Arc<AtomicUsize>,
}

impl InnovationFileTool {
    pub const NAME: &'static str = "write_innovation_file";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn file_name(index: usize) -> String {
        format!("{index}_innovation_file.json")
    }

    /// Number of files written so far
    pub fn files_written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }
}

impl Tool for InnovationFileTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Write the next numbered innovation file"
    }

    fn input_schema(&self) -> Option<Value> {
        Some(serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The content of the file to write"
                }
            },
            "required": ["content"]
        }))
    }

    fn invoke(&self, arguments: &Arguments) -> ToolResult<String> {
        let content = required(Self::NAME, arguments, "content")?;
        let index = self.written.load(Ordering::SeqCst);
        write(Self::NAME, &self.dir.join(Self::file_name(index)), content)?;
        self.written.fetch_add(1, Ordering::SeqCst);
        Ok("Successfully wrote innovation file.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(pairs: &[(&str, &str)]) -> Arguments {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn write_file_uses_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteFileTool::new(dir.path());

        let status = tool.invoke(&args(&[("content", "summary")])).unwrap();
        assert!(status.starts_with("Successfully wrote file"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("write_file.txt")).unwrap(),
            "summary"
        );
    }

    #[rstest]
    #[case("report.txt")]
    #[case("../../etc/report.txt")]
    #[case("/tmp/nested/report.txt")]
    fn fname_is_confined_to_output_dir(#[case] fname: &str) {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteFileTool::new(dir.path());

        tool.invoke(&args(&[("fname", fname), ("content", "x")])).unwrap();
        assert!(dir.path().join("report.txt").exists());
    }

    #[test]
    fn write_json_file_accepts_single_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteJsonFileTool::new(dir.path());

        tool.invoke(&args(&[("json_str", "{'total': 3, 'names': ['ada']}")]))
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("write_json_file.json")).unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value, serde_json::json!({ "total": 3, "names": ["ada"] }));
        assert!(written.contains('\n'));
    }

    #[test]
    fn write_json_file_reports_malformed_input_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteJsonFileTool::new(dir.path());

        let status = tool.invoke(&args(&[("json_str", "{not json")])).unwrap();
        assert!(status.starts_with("Error decoding JSON"));
        assert!(!dir.path().join("write_json_file.json").exists());
    }

    #[test]
    fn write_yml_file_re_emits_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteYamlFileTool::new(dir.path());

        tool.invoke(&args(&[("json_str", "{'total': 3}")])).unwrap();

        let written = std::fs::read_to_string(dir.path().join("write_yml_file.yml")).unwrap();
        assert_eq!(written.trim(), "total: 3");
    }

    #[test]
    fn missing_content_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WriteYamlFileTool::new(dir.path())
            .invoke(&Arguments::new())
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument { ref argument, .. } if argument == "json_str"));
    }

    #[test]
    fn innovation_files_are_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let tool = InnovationFileTool::new(dir.path());
        let shared = tool.clone();

        for body in ["{\"idea\": 1}", "{\"idea\": 2}"] {
            assert_eq!(
                tool.invoke(&args(&[("content", body)])).unwrap(),
                "Successfully wrote innovation file."
            );
        }

        assert_eq!(shared.files_written(), 2);
        assert!(dir.path().join("0_innovation_file.json").exists());
        assert!(dir.path().join("1_innovation_file.json").exists());
    }
}
