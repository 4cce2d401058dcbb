//! `shell_exec`: run a command line through `sh -c`.

use crate::tool::{optional_str, required_str, Tool, ToolArgs, ToolError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs `command` with `sh -c`, optionally in `cwd`.
///
/// Returns stdout followed by stderr. A non-zero exit is an error carrying
/// the exit code and the same combined output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecTool;

#[async_trait]
impl Tool for ShellExecTool {
    fn name(&self) -> &str {
        "shell_exec"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its output"
    }

    async fn call(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let command_line = required_str(args, "command")?;
        let cwd = optional_str(args, "cwd")?;

        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        debug!(command = command_line, cwd = ?cwd, "Running shell command");
        let output = command.output().await?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(text)
        } else {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            Err(ToolError::Execution(format!("exit status {code}: {text}")))
        }
    }
}
