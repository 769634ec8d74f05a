//! Interactive prompt: `list`, `call <tool> <json>`, `help`, `quit`.

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::runner::{ToolCall, ToolRunner};
use crate::tools::Tool;

const PROMPT: &str = "jira> ";

const HELP: &str = r#"
Available Commands

  list                      List available tools
  call <tool> <json>        Call a tool with JSON arguments
  help                      Show this help
  quit                      Exit

Examples:
  call get_issue {"issueKey": "TEST-123"}
  call create_jira_issue {"projectKey": "TEST", "summary": "New issue", "issueType": "Task"}
  call search_issues {"projectKey": "TEST", "jql": "status = Open"}
"#;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Empty,
    Quit,
    Help,
    List,
    Call { tool: String, arguments: Value },
}

/// Input the shell could not turn into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing tool name")]
    MissingToolName,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Unknown command. Type 'help' for available commands.")]
    UnknownCommand,
}

/// Parse one line of input.
///
/// Keywords are case-insensitive, except `call`. The JSON after the tool
/// name is optional and defaults to `{}`.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }

    match line.to_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "help" => return Ok(Command::Help),
        "list" => return Ok(Command::List),
        _ => {}
    }

    if line == "call" {
        return Err(ParseError::MissingToolName);
    }
    let Some(rest) = line.strip_prefix("call ") else {
        return Err(ParseError::UnknownCommand);
    };

    let rest = rest.trim_start();
    let (tool, json) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(tool, json)| (tool, json.trim()));

    let arguments = if json.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str(json).map_err(|e| ParseError::InvalidJson(e.to_string()))?
    };

    Ok(Command::Call {
        tool: tool.to_string(),
        arguments,
    })
}

/// What the loop should do after handling a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print the text (if any) and read the next line
    Continue(String),
    /// Print the text and stop
    Exit(String),
}

/// Interactive session over a [`ToolRunner`].
pub struct Shell {
    runner: ToolRunner,
}

impl Shell {
    #[must_use]
    pub fn new(runner: ToolRunner) -> Self {
        Self { runner }
    }

    /// Handle one input line and produce the text to show.
    pub async fn handle_line(&self, line: &str) -> Reply {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => return Reply::Continue(format!("{} {err}", "❌".red())),
        };

        match command {
            Command::Empty => Reply::Continue(String::new()),
            Command::Quit => Reply::Exit("Goodbye!".to_string()),
            Command::Help => Reply::Continue(HELP.to_string()),
            Command::List => Reply::Continue(self.render_tool_list()),
            Command::Call { tool, arguments } => {
                let call = self.runner.call_tool(&tool, arguments).await;
                Reply::Continue(render_call(&call))
            }
        }
    }

    fn render_tool_list(&self) -> String {
        let names = self.runner.list_available_tools();
        let mut out = format!("\n📋 Available tools ({}):\n\n", names.len());
        for tool in Tool::ALL {
            let required = tool.required();
            let args = if required.is_empty() {
                String::new()
            } else {
                format!(" ({})", required.join(", "))
            };
            out.push_str(&format!(
                "     • {}{} - {}\n",
                tool.name().bold(),
                args.dimmed(),
                tool.description()
            ));
        }
        out
    }

    /// Read lines until `quit` or end of input.
    ///
    /// Ctrl-C at the prompt clears the line; Ctrl-C during a call abandons
    /// the call. Neither ends the session.
    pub async fn run(&self) -> Result<()> {
        let mut editor = DefaultEditor::new().context("Failed to initialise line editor")?;

        println!("{}", "Jira CLI".bold());
        println!();
        println!("Type 'help' for commands, 'quit' to exit");
        println!();

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        let _ = editor.add_history_entry(line);
                    }

                    let reply = tokio::select! {
                        reply = self.handle_line(line) => reply,
                        _ = tokio::signal::ctrl_c() => Reply::Continue("\n^C".to_string()),
                    };

                    match reply {
                        Reply::Continue(text) => {
                            if !text.is_empty() {
                                println!("{text}");
                            }
                        }
                        Reply::Exit(text) => {
                            println!("{text}");
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => println!("^C"),
                Err(ReadlineError::Eof) => {
                    println!("\nGoodbye!");
                    break;
                }
                Err(err) => return Err(err).context("Failed to read input"),
            }
        }

        Ok(())
    }
}

/// Pretty result on success, `Error: ...` otherwise.
fn render_call(call: &ToolCall) -> String {
    match (&call.result, &call.error) {
        (Some(result), _) if call.success => {
            let body = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
            format!("\n{body}\n")
        }
        (_, error) => format!(
            "\n{} {}\n",
            "❌ Error:".red(),
            error.as_deref().unwrap_or("unknown error")
        ),
    }
}
