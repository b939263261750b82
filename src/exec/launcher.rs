use super::escalation::ElevatedCommand;
use crate::security::ValidatedCommand;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

/// Everything needed to spawn one process.
///
/// Only constructible from policy-checked values, so no launcher can ever be
/// handed an unvalidated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl LaunchSpec {
    /// Argv-separated spawn of an allowlisted program.
    pub(crate) fn direct(command: &ValidatedCommand, cwd: &Path, env: Vec<(String, String)>) -> Self {
        let mut argv = command.argv().into_iter();
        let program = argv.next().unwrap_or_default();
        Self {
            program,
            args: argv.collect(),
            cwd: Some(cwd.to_path_buf()),
            env,
        }
    }

    /// `su -c <inner>`; the escalation shell's own cwd and environment apply.
    pub(crate) fn elevated(command: &ElevatedCommand) -> Self {
        let [program, flag, inner] = command.argv();
        Self {
            program: program.to_string(),
            args: vec![flag.to_string(), inner.to_string()],
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

/// Raw bytes and exit code of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: i32,
}

/// Process-launch primitive: argv + cwd + env in, output and exit status out.
pub trait ProcessLauncher: Send + Sync {
    fn launch<'a>(
        &'a self,
        spec: &'a LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = std::io::Result<RawOutput>> + Send + 'a>>;
}

/// Spawns real processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch<'a>(
        &'a self,
        spec: &'a LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = std::io::Result<RawOutput>> + Send + 'a>> {
        Box::pin(async move {
            let mut cmd = tokio::process::Command::new(&spec.program);
            cmd.args(&spec.args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            if let Some(cwd) = &spec.cwd {
                cmd.current_dir(cwd);
            }
            for (key, value) in &spec.env {
                cmd.env(key, value);
            }

            // `output()` drains both pipes concurrently before reaping.
            let output = cmd.output().await?;
            Ok(RawOutput {
                stdout: output.stdout,
                stderr: output.stderr,
                exit_code: exit_code_of(output.status),
            })
        })
    }
}

fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
