//! External tool invocation.
//!
//! Bootstrap, install and format are separate processes whose output is
//! streamed to the operator line by line as it arrives.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use magic_react_common_config::{ToolCommand, ToolsConfig};
use magic_react_common_log::spans::{instrument_future, tool_span};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::output::Printer;

/// A fully resolved tool command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Pipeline stage the tool serves.
    pub name: &'static str,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    fn from_command(name: &'static str, command: &ToolCommand, project: &str, cwd: &Path) -> Self {
        Self {
            name,
            program: command.program.clone(),
            args: command.resolved_args(project),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Create the project from inside its parent directory.
    pub fn bootstrap(tools: &ToolsConfig, project: &str, workdir: &Path) -> Self {
        Self::from_command("bootstrap", &tools.bootstrap, project, workdir)
    }

    /// Install `dependencies` inside the project.
    pub fn install(tools: &ToolsConfig, project: &str, project_dir: &Path, dependencies: &[String]) -> Self {
        let mut invocation = Self::from_command("install", &tools.install, project, project_dir);
        invocation.args.extend(dependencies.iter().cloned());
        invocation
    }

    /// Format the project's sources in place.
    pub fn format(tools: &ToolsConfig, project: &str, project_dir: &Path) -> Self {
        Self::from_command("format", &tools.format, project, project_dir)
    }

    /// The command line as typed in a shell.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{name}: could not start `{command}`: {source}")]
    Spawn {
        name: &'static str,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{name}: `{command}` exited with {}", exit_description(.code))]
    Failed {
        name: &'static str,
        command: String,
        code: Option<i32>,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl ToolError {
    /// The stage whose tool failed.
    pub fn tool(&self) -> &'static str {
        match self {
            Self::Spawn { name, .. } | Self::Failed { name, .. } => name,
        }
    }
}

/// Runs external tools to completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<(), ToolError>;
}

/// Spawns tools as child processes and forwards their output.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    printer: Printer,
}

impl ProcessRunner {
    pub fn new(printer: Printer) -> Self {
        Self { printer }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), ToolError> {
        let span = tool_span(invocation.name, &invocation.program);
        instrument_future(self.spawn_and_wait(invocation), span).await
    }
}

impl ProcessRunner {
    async fn spawn_and_wait(&self, invocation: &Invocation) -> Result<(), ToolError> {
        let command = invocation.display();
        debug!(%command, cwd = %invocation.cwd.display(), "spawning tool");

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolError::Spawn {
                name: invocation.name,
                command: command.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let printer = self.printer;

        let (_, _, status) = tokio::join!(
            forward_lines(stdout, |line| printer.tool_output(line)),
            forward_lines(stderr, |line| printer.tool_error(line)),
            child.wait(),
        );

        let status = status.map_err(|source| ToolError::Spawn {
            name: invocation.name,
            command: command.clone(),
            source,
        })?;

        debug!(code = ?status.code(), "tool exited");
        if status.success() {
            Ok(())
        } else {
            Err(ToolError::Failed {
                name: invocation.name,
                command,
                code: status.code(),
            })
        }
    }
}

/// Hand every line of `stream` to `emit` until it closes.
async fn forward_lines<R, F>(stream: Option<R>, emit: F)
where
    R: AsyncRead + Unpin,
    F: Fn(&str),
{
    let Some(stream) = stream else {
        return;
    };
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => emit(&line),
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "tool output stream closed");
                break;
            }
        }
    }
}
