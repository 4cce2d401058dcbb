//! File tools: `read_file`, `write_file`, `list_dir`.

use crate::tool::{required_str, Tool, ToolArgs, ToolError};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

/// Reads a UTF-8 file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file"
    }

    async fn call(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let path = required_str(args, "path")?;
        Ok(fs::read_to_string(path).await?)
    }
}

/// Writes `content` to `path`, creating parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file, replacing it"
    }

    async fn call(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let path = required_str(args, "path")?;
        let content = required_str(args, "content")?;

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, content).await?;

        Ok(format!("Wrote {} bytes to {path}", content.len()))
    }
}

/// Lists a directory, one sorted entry per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListDirTool;

#[async_trait]
impl Tool for ListDirTool {
    fn name(&self) -> &str {
        "list_dir"
    }

    fn description(&self) -> &str {
        "List the entries of a directory"
    }

    async fn call(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let path = required_str(args, "path")?;

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().await?.is_dir() {
                name.push('/');
            }
            entries.push(name);
        }
        entries.sort();

        Ok(entries.join("\n"))
    }
}
