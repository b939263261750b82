use super::ExecutionResult;
use super::escalation::ElevatedCommand;
use super::launcher::{LaunchSpec, ProcessLauncher, RawOutput, SystemLauncher};
use crate::config::ExecutionConfig;
use crate::security::ValidatedCommand;
use crate::session::ShellSession;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Probe run through the escalation shell to detect root access.
const PRIVILEGE_PROBE: &[&str] = &["echo", "test"];

/// Environment injected into unprivileged processes alongside `HOME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEnv {
    pub term: String,
    pub lang: String,
}

impl From<&ExecutionConfig> for ExecutionEnv {
    fn from(config: &ExecutionConfig) -> Self {
        Self {
            term: config.term.clone(),
            lang: config.lang.clone(),
        }
    }
}

impl Default for ExecutionEnv {
    fn default() -> Self {
        Self::from(&ExecutionConfig::default())
    }
}

/// Spawns validated commands and turns every outcome into an
/// [`ExecutionResult`]. Nothing here returns an error to the caller.
#[derive(Clone)]
pub struct ExecutionEngine {
    launcher: Arc<dyn ProcessLauncher>,
    env: ExecutionEnv,
}

impl ExecutionEngine {
    pub fn new(launcher: Arc<dyn ProcessLauncher>, env: ExecutionEnv) -> Self {
        Self { launcher, env }
    }

    pub fn system(env: ExecutionEnv) -> Self {
        Self::new(Arc::new(SystemLauncher), env)
    }

    /// Argv-separated spawn in the session's cwd with `HOME`, `TERM` and
    /// `LANG` set.
    pub async fn execute(
        &self,
        command: &ValidatedCommand,
        session: &ShellSession,
    ) -> ExecutionResult {
        let env = vec![
            ("HOME".to_string(), session.home().display().to_string()),
            ("TERM".to_string(), self.env.term.clone()),
            ("LANG".to_string(), self.env.lang.clone()),
        ];
        let spec = LaunchSpec::direct(command, session.cwd(), env);
        info!(
            program = command.program(),
            args = command.args().len(),
            cwd = %session.cwd().display(),
            "executing command"
        );
        self.run(&spec, "Execution failed").await
    }

    /// `su -c <inner>` spawn.
    pub async fn execute_elevated(&self, command: &ElevatedCommand) -> ExecutionResult {
        self.run_elevated(command, "Root execution failed").await
    }

    pub(crate) async fn run_elevated(
        &self,
        command: &ElevatedCommand,
        failure_label: &str,
    ) -> ExecutionResult {
        let spec = LaunchSpec::elevated(command);
        info!(program = command.program(), "executing elevated command");
        self.run(&spec, failure_label).await
    }

    /// `true` iff `su -c "echo test"` exits with status zero. Output is
    /// discarded and spawn failure counts as no access.
    pub async fn check_privileged_access(&self) -> bool {
        let probe = ElevatedCommand::from_trusted_parts(PRIVILEGE_PROBE[0], &PRIVILEGE_PROBE[1..]);
        let spec = LaunchSpec::elevated(&probe);
        match self.launcher.launch(&spec).await {
            Ok(output) => output.exit_code == 0,
            Err(e) => {
                debug!("privilege probe could not spawn: {e}");
                false
            }
        }
    }

    async fn run(&self, spec: &LaunchSpec, failure_label: &str) -> ExecutionResult {
        debug!(argv = ?spec.argv(), "launching");
        match self.launcher.launch(spec).await {
            Ok(output) => capture(&output),
            Err(e) => {
                warn!(program = spec.program(), "{failure_label}: {e}");
                ExecutionResult::failure(format!("{failure_label}: {e}"))
            }
        }
    }
}

fn capture(output: &RawOutput) -> ExecutionResult {
    ExecutionResult {
        stdout: line_normalized(&output.stdout),
        stderr: line_normalized(&output.stderr),
        exit_code: output.exit_code,
    }
}

/// Decode as text and terminate every line with `\n`. `\n`, `\r\n` and a
/// lone `\r` all end a line.
fn line_normalized(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes).replace("\r\n", "\n");
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.split_terminator(['\n', '\r']) {
        out.push_str(line);
        out.push('\n');
    }
    out
}
