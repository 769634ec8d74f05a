//! Jira REST API client.
//!
//! This crate provides:
//! - Connection configuration with credential validation
//! - A typed client for the Jira REST v2 endpoints the CLI needs
//! - Type definitions for Jira entities
//!
//! # Example
//!
//! ```no_run
//! use jira::{JiraClient, JiraConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = JiraConfig::resolve(
//!     Some("your-domain.atlassian.net"),
//!     Some("you@example.com"),
//!     Some("api-token"),
//! )?;
//! let client = JiraClient::new(&config)?;
//!
//! let issue = client.get_issue("PROJ-123", None, None).await?;
//! println!("{}: {:?}", issue.key, issue.fields.summary);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{resolve_link_type, JiraClient};
pub use config::JiraConfig;
pub use error::{ConfigError, JiraError};
pub use models::*;
