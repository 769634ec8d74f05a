//! Interactive Jira client.
//!
//! This crate provides:
//! - A fixed catalogue of Jira tools (issues, search, comments, links,
//!   attachments, users, fields, issue and link types)
//! - Argument validation that short-circuits before any network call
//! - Dispatch by tool name into a uniform JSON envelope
//! - A line-editing shell accepting `call <tool> <json>`
//!
//! # Example
//!
//! ```no_run
//! use jira::{JiraClient, JiraConfig};
//! use jira_cli::ToolRunner;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = JiraClient::new(&JiraConfig::from_env()?)?;
//! let runner = ToolRunner::new(client);
//!
//! let call = runner.call_tool("get_issue", json!({"issueKey": "TEST-123"})).await;
//! println!("{}", serde_json::to_string_pretty(&call)?);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod args;
pub mod error;
pub mod runner;
pub mod shell;
pub mod tools;

pub use args::Arguments;
pub use error::ToolError;
pub use runner::{ToolCall, ToolRunner};
pub use shell::{parse_command, Command, ParseError, Reply, Shell};
pub use tools::Tool;
