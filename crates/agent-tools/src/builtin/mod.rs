//! Built-in tools.

mod fs;
mod shell;

pub use fs::{ListDirTool, ReadFileTool, WriteFileTool};
pub use shell::ShellExecTool;
