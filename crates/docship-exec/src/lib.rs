//! Typed external-process execution for the docship pipeline.
//!
//! Every external tool the pipeline drives (git, sphinx-build, make) goes
//! through [`run`]: explicit argument lists, no shell interpolation, and
//! captured output. A failing command surfaces as [`ExecError::Failed`]
//! carrying the rendered command line and its combined stderr + stdout so
//! the CLI can print a usable diagnostic.

pub mod git;

use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Error from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The program could not be started at all.
    #[error("failed to start command: {command}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("command failed ({status}): {command}\n{output}")]
    Failed {
        /// Rendered command line.
        command: String,
        /// Exit code, or "signal" when terminated by a signal.
        status: String,
        /// Combined stderr + stdout.
        output: String,
    },
}

/// Run a command to completion, capturing its output.
///
/// Returns combined stderr + stdout on success. `cwd` sets the working
/// directory for the child process; the parent process is never moved.
///
/// # Errors
///
/// [`ExecError::Spawn`] if the program cannot be started,
/// [`ExecError::Failed`] on a non-zero exit.
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<String, ExecError> {
    let rendered = render(program, args);
    debug!("running: {rendered}");

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|source| ExecError::Spawn {
        command: rendered.clone(),
        source,
    })?;

    // stderr first, matching what a terminal user usually needs to see
    let mut combined = String::from_utf8_lossy(&output.stderr).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));

    if !output.status.success() {
        let status = output
            .status
            .code()
            .map_or_else(|| "signal".to_owned(), |code| code.to_string());
        return Err(ExecError::Failed {
            command: rendered,
            status,
            output: combined,
        });
    }

    Ok(combined)
}

/// Render a program + argument list as a single diagnostic line.
fn render(program: &str, args: &[&str]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        if arg.contains(char::is_whitespace) {
            line.push('\'');
            line.push_str(arg);
            line.push('\'');
        } else {
            line.push_str(arg);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_captures_stdout() {
        let output = run("sh", &["-c", "echo hello"], None).unwrap();
        assert_eq!(output, "hello\n");
    }

    #[test]
    fn run_combines_stderr_before_stdout() {
        let output = run("sh", &["-c", "echo out; echo err >&2"], None).unwrap();
        assert_eq!(output, "err\nout\n");
    }

    #[test]
    fn run_respects_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let output = run("pwd", &[], Some(dir.path())).unwrap();
        let reported = std::path::Path::new(output.trim());
        // Compare canonically, tmpdirs are often behind symlinks
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn failed_command_reports_status_and_output() {
        let err = run("sh", &["-c", "echo broken >&2; exit 3"], None).unwrap_err();
        match err {
            ExecError::Failed {
                command,
                status,
                output,
            } => {
                assert_eq!(status, "3");
                assert!(command.starts_with("sh -c"));
                assert!(output.contains("broken"));
            }
            ExecError::Spawn { .. } => panic!("expected Failed"),
        }
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = run("docship-no-such-binary", &[], None).unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[test]
    fn render_quotes_whitespace_arguments() {
        assert_eq!(
            render("git", &["commit", "-m", "two words"]),
            "git commit -m 'two words'"
        );
    }
}
