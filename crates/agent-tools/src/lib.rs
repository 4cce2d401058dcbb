//! # Agent Tools
//!
//! A small surface of named operations that agents call with a JSON object of
//! arguments and get text back.
//!
//! ## Built-in Tools
//!
//! | Name | Arguments | Result |
//! |------|-----------|--------|
//! | `shell_exec` | `command`, optional `cwd` | stdout followed by stderr |
//! | `read_file` | `path` | file contents |
//! | `write_file` | `path`, `content` | confirmation with byte count |
//! | `list_dir` | `path` | one entry per line, directories end in `/` |
//!
//! The heartbeat bus does not depend on this crate.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod builtin;
pub mod registry;
pub mod tool;

pub use builtin::{ListDirTool, ReadFileTool, ShellExecTool, WriteFileTool};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolArgs, ToolError};
