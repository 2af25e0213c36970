//! Tools and per-participant tool tables
//!
//! A [`Tool`] is an opaque, side-effecting capability invoked with named
//! string arguments. A [`ToolTable`] maps tool names to implementations for a
//! single participant; a participant that exposes a non-empty table is
//! tool-capable.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ToolError, ToolResult};
use crate::identifiers::ToolId;
use crate::message::Arguments;

/// Trait defining an external capability that participants can invoke.
///
/// # Example
///
/// ```rust
/// use parley_core::tool::Tool;
/// use parley_core::{Arguments, ToolError};
///
/// struct ShoutTool;
///
/// impl Tool for ShoutTool {
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     fn invoke(&self, arguments: &Arguments) -> Result<String, ToolError> {
///         let text = arguments
///             .get("text")
///             .ok_or_else(|| ToolError::missing_argument(self.name(), "text"))?;
///         Ok(text.to_uppercase())
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// Returns the unique name identifier for this tool.
    ///
    /// The name is the key a tool invocation request must carry for the
    /// owning participant to resolve it.
    fn name(&self) -> &str;

    /// Returns a human-readable description of the tool.
    ///
    /// Reply generators forward this to the model as part of the function
    /// definition.
    fn description(&self) -> &str {
        ""
    }

    /// Returns the JSON Schema for the tool's arguments.
    ///
    /// The default implementation returns `None`, meaning the tool accepts an
    /// object of free-form string properties.
    fn input_schema(&self) -> Option<serde_json::Value> {
        None
    }

    /// Execute the tool.
    ///
    /// # Parameters
    ///
    /// * `arguments` - Named string arguments from the invocation request
    ///
    /// # Returns
    ///
    /// A human-readable status or payload string on success. Errors are
    /// propagated to the caller of the conversation unchanged.
    fn invoke(&self, arguments: &Arguments) -> ToolResult<String>;
}

/// Closure-backed tool.
///
/// ```rust
/// use parley_core::tool::{FnTool, Tool};
/// use parley_core::Arguments;
///
/// let tool = FnTool::new("echo", |args: &Arguments| {
///     Ok(args.get("text").cloned().unwrap_or_default())
/// });
///
/// let mut args = Arguments::new();
/// args.insert("text".into(), "hi".into());
/// assert_eq!(tool.invoke(&args).unwrap(), "hi");
/// ```
pub struct FnTool<F> {
    name: String,
    description: String,
    func: F,
}

impl<F> FnTool<F>
where
    F: Fn(&Arguments) -> ToolResult<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            func,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl<F> Tool for FnTool<F>
where
    F: Fn(&Arguments) -> ToolResult<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn invoke(&self, arguments: &Arguments) -> ToolResult<String> {
        (self.func)(arguments)
    }
}

impl<F> fmt::Debug for FnTool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool").field("name", &self.name).finish()
    }
}

/// Tool table of a single participant.
///
/// Tools are stored by validated name in a `BTreeMap`, so listings come out in
/// a stable order.
#[derive(Clone, Default)]
pub struct ToolTable {
    tools: BTreeMap<ToolId, Arc<dyn Tool>>,
}

impl ToolTable {
    /// Create an empty tool table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name.
    ///
    /// # Errors
    ///
    /// Fails if the tool name is not a valid identifier or if a tool with the
    /// same name is already registered.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> ToolResult<()> {
        let id = ToolId::parse(tool.name()).map_err(|source| ToolError::InvalidName {
            attempted_name: tool.name().to_string(),
            source,
        })?;

        if self.tools.contains_key(&id) {
            return Err(ToolError::DuplicateName {
                name: id.to_string(),
            });
        }

        self.tools.insert(id, tool);
        Ok(())
    }

    /// Register a tool using the builder pattern
    pub fn try_with_tool(mut self, tool: Arc<dyn Tool>) -> ToolResult<Self> {
        self.register(tool)?;
        Ok(self)
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(&ToolId::new_unchecked(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Invoke the named tool.
    ///
    /// # Errors
    ///
    /// [`ToolError::NotFound`] if no tool is registered under `name`,
    /// otherwise whatever the tool itself returns.
    pub fn invoke(&self, name: &str, arguments: &Arguments) -> ToolResult<String> {
        let tool = self.get(name).ok_or_else(|| ToolError::NotFound {
            name: name.to_string(),
        })?;
        tool.invoke(arguments)
    }

    /// Iterate over registered tools in name order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(ToolId::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolTable")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(name: &str) -> Arc<dyn Tool> {
        Arc::new(FnTool::new(name, |args: &Arguments| {
            Ok(args.get("text").cloned().unwrap_or_default())
        }))
    }

    #[test]
    fn register_and_invoke() {
        let table = ToolTable::new().try_with_tool(echo("echo")).unwrap();

        let mut args = Arguments::new();
        args.insert("text".to_string(), "hello".to_string());

        assert!(table.contains("echo"));
        assert_eq!(table.invoke("echo", &args).unwrap(), "hello");
    }

    #[test]
    fn invoking_unknown_tool_fails() {
        let table = ToolTable::new();
        let err = table.invoke("missing", &Arguments::new()).unwrap_err();
        assert!(matches!(err, ToolError::NotFound { ref name } if name == "missing"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut table = ToolTable::new();
        table.register(echo("echo")).unwrap();
        let err = table.register(echo("echo")).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateName { .. }));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let err = ToolTable::new().try_with_tool(echo("bad name")).unwrap_err();
        assert!(matches!(err, ToolError::InvalidName { .. }));
    }

    #[test]
    fn names_are_sorted() {
        let table = ToolTable::new()
            .try_with_tool(echo("write_yml_file"))
            .and_then(|t| t.try_with_tool(echo("write_file")))
            .unwrap();
        assert_eq!(table.names(), vec!["write_file", "write_yml_file"]);
    }
}
