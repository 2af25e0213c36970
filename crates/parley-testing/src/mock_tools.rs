//! # Mock Tools for Testing
//!
//! Tools that return predictable output, so conversation tests do not touch
//! databases or the filesystem.

use parley_core::{Arguments, Tool, ToolError, ToolResult};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockResponse {
    Success(String),
    Failure(String),
}

/// A mock tool that returns a fixed response and records its calls.
///
/// Clones share call count and history, so a clone kept by the test observes
/// calls made through the clone registered with a participant.
#[derive(Debug, Clone)]
pub struct MockTool {
    name: String,
    description: String,
    response: MockResponse,
    call_count: Arc<Mutex<usize>>,
    call_history: Arc<Mutex<Vec<Arguments>>>,
}

impl MockTool {
    /// Create a mock tool answering with an empty success
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            response: MockResponse::Success(String::new()),
            call_count: Arc::new(Mutex::new(0)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Return `output` on every call
    pub fn returning(mut self, output: impl Into<String>) -> Self {
        self.response = MockResponse::Success(output.into());
        self
    }

    /// Fail every call with [`ToolError::ExecutionFailed`]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.response = MockResponse::Failure(message.into());
        self
    }

    /// Number of times this tool has been called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Arguments of every call, in order
    pub fn call_history(&self) -> Vec<Arguments> {
        self.call_history.lock().unwrap().clone()
    }

    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Reset call count and history
    pub fn reset(&self) {
        *self.call_count.lock().unwrap() = 0;
        self.call_history.lock().unwrap().clear();
    }
}

impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn invoke(&self, arguments: &Arguments) -> ToolResult<String> {
        *self.call_count.lock().unwrap() += 1;
        self.call_history.lock().unwrap().push(arguments.clone());

        match &self.response {
            MockResponse::Success(output) => Ok(output.clone()),
            MockResponse::Failure(message) => {
                Err(ToolError::execution_failed(&self.name, message.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_calls_across_clones() {
        let tool = MockTool::new("run_sql").returning("ok");
        let registered = tool.clone();

        let mut args = Arguments::new();
        args.insert("sql".into(), "SELECT 1".into());
        assert_eq!(registered.invoke(&args).unwrap(), "ok");

        assert_eq!(tool.call_count(), 1);
        assert_eq!(tool.call_history(), vec![args]);

        tool.reset();
        assert!(!registered.was_called());
    }

    #[test]
    fn failing_tool_reports_execution_failure() {
        let tool = MockTool::new("write_file").failing("disk full");
        let err = tool.invoke(&Arguments::new()).unwrap_err();
        assert_eq!(err.tool_name(), Some("write_file"));
        assert!(err.to_string().contains("disk full"));
        assert_eq!(tool.call_count(), 1);
    }
}
