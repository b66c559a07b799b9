use crate::error::{Error, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::debug;

/// An external build-tool invocation (pants, fastpass, ...)
///
/// Arguments are handed to the OS verbatim; no shell is involved. The shell
/// form from [`ToolCommand::to_shell_command`] is for logs and dry runs only.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

/// Captured result of a command that exited successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Non-empty stdout lines, trimmed
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|line| !line.is_empty())
    }
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
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

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn to_shell_command(&self) -> String {
        let mut cmd = shell_quote(&self.program);
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&shell_quote(arg));
        }
        cmd
    }

    /// Start the process with piped stdout/stderr.
    ///
    /// The child is running once this returns; await [`RunningCommand::wait`]
    /// to collect its output.
    pub fn spawn(&self) -> Result<RunningCommand> {
        let shell = self.to_shell_command();
        debug!("Spawning: {}", shell);

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env {
            debug!("Setting env: {}={}", key, value);
            cmd.env(key, value);
        }

        let child = cmd.spawn().map_err(|e| Error::Spawn {
            command: shell.clone(),
            source: e.into(),
        })?;

        Ok(RunningCommand { child, shell })
    }

    /// Spawn, wait, and map the exit code to a typed result
    pub async fn run(&self) -> Result<ProcessOutput> {
        self.spawn()?.wait().await
    }
}

/// A spawned [`ToolCommand`]
#[derive(Debug)]
pub struct RunningCommand {
    child: Child,
    shell: String,
}

impl RunningCommand {
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Drain both pipes and wait for exit.
    ///
    /// Exit code 0 yields the captured output. Anything else becomes
    /// [`Error::ExternalProcessFailure`], which keeps whatever stdout was
    /// produced before the failure next to the stderr text.
    pub async fn wait(self) -> Result<ProcessOutput> {
        let RunningCommand { child, shell } = self;
        let output = child.wait_with_output().await?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            debug!("`{}` finished ({} bytes of stdout)", shell, stdout.len());
            Ok(ProcessOutput { stdout, stderr })
        } else {
            debug!("`{}` failed with {:?}", shell, output.status.code());
            Err(Error::ExternalProcessFailure {
                command: shell,
                code: output.status.code(),
                stdout,
                stderr,
            })
        }
    }
}

/// Wait at most `wait` for `fut`, then fall back.
///
/// Only for display code that has nothing better to do than show a
/// placeholder; everything else composes futures instead.
pub async fn complete_on_timeout<T, F>(fut: F, wait: Duration, fallback: T) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(wait, fut).await.unwrap_or(fallback)
}

fn shell_quote(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || "'\"\\$`!*?&|;<>()[]{}#~".contains(c));

    if needs_quotes {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_command_quotes_only_when_needed() {
        let cmd = ToolCommand::new("./pants")
            .arg("list")
            .arg("src/my dir::")
            .arg("it's")
            .arg("");
        insta::assert_snapshot!(cmd.to_shell_command(), @r"./pants list 'src/my dir::' 'it'\''s' ''");
    }

    #[test]
    fn test_builder_collects_env_and_dir() {
        let cmd = ToolCommand::new("fastpass")
            .args(["amend", "--new-targets"])
            .with_working_dir("/repo")
            .with_env("FASTPASS_HOME", "/bsp");
        assert_eq!(cmd.args, vec!["amend", "--new-targets"]);
        assert_eq!(cmd.working_dir(), Some(Path::new("/repo")));
        assert_eq!(cmd.env, vec![("FASTPASS_HOME".to_string(), "/bsp".to_string())]);
    }

    #[test]
    fn test_output_lines_skip_blank() {
        let output = ProcessOutput {
            stdout: "a:b\n\n  c:d  \n".to_string(),
            stderr: String::new(),
        };
        assert_eq!(output.lines().collect::<Vec<_>>(), vec!["a:b", "c:d"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_captures_stdout_and_stderr() {
        let output = ToolCommand::new("sh")
            .args(["-c", "echo out; echo err >&2"])
            .run()
            .await
            .unwrap();
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_maps_to_failure_with_partial_output() {
        let err = ToolCommand::new("sh")
            .args(["-c", "echo partial; echo boom >&2; exit 3"])
            .run()
            .await
            .unwrap_err();
        match err {
            Error::ExternalProcessFailure {
                code,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(code, Some(3));
                assert_eq!(stdout, "partial\n");
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let output = ToolCommand::new("sh")
            .args(["-c", r#"printf '%s\n' "$1""#, "sh", "a b; $HOME 'q'"])
            .run()
            .await
            .unwrap();
        assert_eq!(output.stdout, "a b; $HOME 'q'\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_working_dir_and_env_are_applied() {
        let temp = tempfile::TempDir::new().unwrap();
        let output = ToolCommand::new("sh")
            .args(["-c", "pwd; echo $PB_TEST_VAR"])
            .with_working_dir(temp.path())
            .with_env("PB_TEST_VAR", "hello")
            .run()
            .await
            .unwrap();
        let mut lines = output.lines();
        let pwd = std::path::PathBuf::from(lines.next().unwrap());
        assert_eq!(
            pwd.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
        assert_eq!(lines.next(), Some("hello"));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let err = ToolCommand::new("pantsbridge-definitely-not-installed")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_complete_on_timeout_falls_back() {
        let pending = futures::future::pending::<u32>();
        let value = complete_on_timeout(pending, Duration::from_millis(10), 7).await;
        assert_eq!(value, 7);

        let ready = async { 1 };
        assert_eq!(complete_on_timeout(ready, Duration::from_millis(10), 7).await, 1);
    }
}
