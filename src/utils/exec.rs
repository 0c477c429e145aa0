//! External command execution utilities.
//!
//! Provides a Builder-based API for running the commands behind
//! `[[rules]]` transform stages: input bytes go to stdin, the transformed
//! bytes come back on stdout.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let output = Cmd::from_slice(&["sass", "--stdin"])
//!     .cwd(root)
//!     .envs([("FORGE_MODE", "production")])
//!     .stdin(source_bytes)
//!     .run()?;
//! ```

use anyhow::{Context, Result, anyhow};
use std::{
    ffi::{OsStr, OsString},
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    stdin_data: Option<Vec<u8>>,
}

impl Cmd {
    /// Create from a command array (e.g., `["sass"]` or `["npx", "esbuild"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args: Vec<_> = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set environment variables for the subprocess.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in vars {
            self.envs.push((k.as_ref().to_owned(), v.as_ref().to_owned()));
        }
        self
    }

    /// Set stdin data to pipe to the process.
    pub fn stdin<D: Into<Vec<u8>>>(mut self, data: D) -> Self {
        self.stdin_data = Some(data.into());
        self
    }

    /// Execute the command and return output.
    ///
    /// A non-zero exit status is an error carrying the command's stderr.
    pub fn run(self) -> Result<Output> {
        let name = self.program_name();
        if name.is_empty() {
            return Err(anyhow!("empty command"));
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.envs.iter().cloned())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let output = match self.stdin_data {
            Some(data) => {
                cmd.stdin(Stdio::piped());
                let mut child = cmd
                    .spawn()
                    .with_context(|| format!("Failed to spawn `{name}`"))?;

                // Feed stdin from a separate thread so a large stdout can't deadlock us
                let writer = child.stdin.take().map(|mut stdin| {
                    std::thread::spawn(move || stdin.write_all(&data))
                });

                let output = child
                    .wait_with_output()
                    .with_context(|| format!("Failed to wait for `{name}`"))?;

                if let Some(handle) = writer {
                    let written = handle
                        .join()
                        .map_err(|_| anyhow!("stdin writer for `{name}` panicked"))?;
                    match written {
                        // The command exited without reading all of its input;
                        // its exit status decides the outcome
                        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                        other => other.with_context(|| format!("Failed to write stdin to `{name}`"))?,
                    }
                }
                output
            }
            None => cmd
                .stdin(Stdio::null())
                .output()
                .with_context(|| format!("Failed to execute `{name}`"))?,
        };

        if !output.status.success() {
            anyhow::bail!(format_error(&name, &output));
        }
        Ok(output)
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }
}

/// Format error message for failed command.
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut msg = format!("Command `{name}` failed with {}", output.status);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        msg.push('\n');
        msg.push_str(stderr);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_builder() {
        let cmd = Cmd::from_slice(&["sass", "--stdin"])
            .cwd("/tmp")
            .envs([("FORGE_MODE", "development")]);

        assert_eq!(cmd.program, OsString::from("sass"));
        assert_eq!(cmd.args, [OsString::from("--stdin")]);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(cmd.envs, [("FORGE_MODE".to_string(), "development".to_string())]);
    }

    #[test]
    fn test_from_slice() {
        let cmd = Cmd::from_slice(&["npx", "esbuild", "--minify"]);
        assert_eq!(cmd.program, OsString::from("npx"));
        assert_eq!(cmd.args.len(), 2);
    }

    #[test]
    fn test_empty_command_fails() {
        let empty: [&str; 0] = [];
        assert!(Cmd::from_slice(&empty).run().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_pipe() {
        let output = Cmd::from_slice(&["cat"]).stdin(b"test data".to_vec()).run().unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, b"test data");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_carries_stderr() {
        let err = Cmd::from_slice(&["sh", "-c", "echo broken >&2; exit 3"])
            .run()
            .unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("`sh` failed"));
        assert!(msg.contains("broken"));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_ignoring_stdin_succeeds() {
        let input = vec![b'x'; 4 * 1024 * 1024];
        let output = Cmd::from_slice(&["sh", "-c", "printf done"])
            .stdin(input)
            .run()
            .unwrap();
        assert_eq!(output.stdout, b"done");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_ignoring_stdin_still_reports_failure() {
        let input = vec![b'x'; 4 * 1024 * 1024];
        let err = Cmd::from_slice(&["sh", "-c", "echo nope >&2; exit 1"])
            .stdin(input)
            .run()
            .unwrap_err();
        assert!(format!("{err}").contains("nope"));
    }
}
