use std::ffi::OsString;
use std::process::{Command, Output};

use crate::errors::PomvizError;

/// Builder for constructing and executing external processes.
///
/// Provides a fluent API for setting the program and its arguments. Arguments
/// are kept as `OsString` so filesystem paths pass through untouched.
pub struct CommandBuilder {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Human-readable rendering of the command line, for logs and errors.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute the command and return its output.
    ///
    /// Only a failure to spawn is an error here; callers inspect the exit status.
    pub fn exec(&self) -> Result<Output, PomvizError> {
        tracing::debug!("running `{}`", self.command_line());
        Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(PomvizError::from)
    }
}
