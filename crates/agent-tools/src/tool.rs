//! # Tool Trait
//!
//! The contract every tool implements, plus argument helpers.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Named arguments passed to a tool.
pub type ToolArgs = Map<String, Value>;

/// Errors from tool lookup and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required argument was not supplied.
    #[error("Missing argument '{0}'")]
    MissingArgument(&'static str),

    /// An argument had the wrong type.
    #[error("Invalid argument '{name}': expected {expected}")]
    InvalidArgument {
        name: &'static str,
        expected: &'static str,
    },

    /// The tool ran but reported failure.
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Filesystem or process I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named operation an agent can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name used to invoke the tool.
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Run the tool.
    async fn call(&self, args: &ToolArgs) -> Result<String, ToolError>;
}

/// Fetch a required string argument.
pub(crate) fn required_str<'a>(args: &'a ToolArgs, name: &'static str) -> Result<&'a str, ToolError> {
    match args.get(name) {
        None | Some(Value::Null) => Err(ToolError::MissingArgument(name)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ToolError::InvalidArgument {
            name,
            expected: "string",
        }),
    }
}

/// Fetch an optional string argument.
pub(crate) fn optional_str<'a>(
    args: &'a ToolArgs,
    name: &'static str,
) -> Result<Option<&'a str>, ToolError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ToolError::InvalidArgument {
            name,
            expected: "string",
        }),
    }
}
