//! External process execution.
//!
//! Everything that shells out (git, the hours tool) goes through
//! [`CommandRunner`], so the workflow can be driven by [`SystemRunner`] in
//! production and by [`RecordingRunner`] in tests.

use crate::error::{HoursError, Result};
use regex::Regex;
use std::borrow::Cow;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

pub mod recording;

pub use recording::RecordingRunner;

pub const GIT: &str = "git";

const LOG_TARGET: &str = "runner";

/// `scheme://user:password@`, with the password ending at the first `@`.
static URL_PASSWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z][A-Za-z0-9+.\-]*://[^/?#@:\s]*):[^/?#@\s]*@").expect("static pattern compiles")
});

/// One external command: program, arguments, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Program and arguments as tokens, program first.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }

}

/// Replace the password of every URL in `text` with `***`.
///
/// Only the userinfo segment is touched, so a percent-encoded token is hidden
/// and text elsewhere that happens to contain the token stays intact.
pub fn redact_credentials(text: &str) -> Cow<'_, str> {
    URL_PASSWORD.replace_all(text, "${1}:***@")
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.tokens().collect::<Vec<_>>().join(" ");
        f.write_str(&redact_credentials(&line))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    /// Run to completion. A non-zero exit is reported in the output, not as an error.
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Run and turn a non-zero exit into [`HoursError::CommandFailed`].
    fn run_checked(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let output = self.run(invocation)?;
        if output.success() {
            return Ok(output);
        }
        Err(HoursError::CommandFailed {
            command: invocation.to_string(),
            code: output
                .code
                .map_or_else(|| "signal".to_string(), |c| c.to_string()),
            stderr: redact_credentials(output.stderr.trim()).into_owned(),
        })
    }
}

pub trait CommandExistsChecker {
    fn exists(&self, program: &str) -> bool;
}

/// Runs real processes, blocking until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        log::debug!(target: LOG_TARGET, "Running `{invocation}`");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        for (k, v) in &invocation.envs {
            cmd.env(k, v);
        }

        let output = cmd.output().map_err(|source| HoursError::Spawn {
            command: invocation.to_string(),
            source,
        })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl CommandExistsChecker for SystemRunner {
    fn exists(&self, program: &str) -> bool {
        Command::new(program)
            .arg("--help")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// Prefer a copy of `tool` shipped in a `bin/` directory next to the running
/// executable, falling back to the bare name for a `PATH` lookup.
pub fn locate_tool(tool: &str) -> String {
    let bundled = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("bin").join(tool)))
        .filter(|p| p.is_file());

    match bundled {
        Some(path) => {
            log::debug!(target: LOG_TARGET, "Using bundled {tool} at {}", path.display());
            path.to_string_lossy().into_owned()
        }
        None => tool.to_string(),
    }
}
