use std::process::{Command, Output};

use crate::errors::DepgraphError;

/// Builder for constructing and executing external processes.
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Execute the command and return its output, whatever the exit status.
    pub fn exec(&self) -> Result<Output, DepgraphError> {
        Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| DepgraphError::Process {
                message: format!("failed to start `{}`: {e}", self.program),
            })
    }

    /// Execute the command and fail unless it exits successfully.
    pub fn exec_checked(&self) -> Result<Output, DepgraphError> {
        let output = self.exec()?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(DepgraphError::Process {
                message: format!(
                    "`{} {}` exited with {}: {}",
                    self.program,
                    self.args.join(" "),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}
