#![allow(dead_code)]

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tempfile::TempDir;

use shellgate::exec::{LaunchSpec, ProcessLauncher, RawOutput};
use shellgate::{Config, Gateway, Outcome, ShellSession};

/// Records every launch and answers with a canned outcome. Never spawns.
pub struct RecordingLauncher {
    seen: Mutex<Vec<LaunchSpec>>,
    outcome: Result<RawOutput, io::ErrorKind>,
}

impl RecordingLauncher {
    pub fn answering(output: RawOutput) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            outcome: Ok(output),
        })
    }

    pub fn failing(kind: io::ErrorKind) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            outcome: Err(kind),
        })
    }

    pub fn seen(&self) -> Vec<LaunchSpec> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn launches(&self) -> usize {
        self.seen().len()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch<'a>(
        &'a self,
        spec: &'a LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = io::Result<RawOutput>> + Send + 'a>> {
        Box::pin(async move {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(spec.clone());
            self.outcome
                .clone()
                .map_err(|kind| io::Error::new(kind, "launcher unavailable"))
        })
    }
}

pub struct Harness {
    pub tmp: TempDir,
    pub gateway: Gateway,
    pub launcher: Arc<RecordingLauncher>,
    pub session: ShellSession,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(RecordingLauncher::answering(RawOutput::default()), |_| {})
    }

    pub fn with_output(stdout: &str, exit_code: i32) -> Self {
        let output = RawOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
            exit_code,
        };
        Self::build(RecordingLauncher::answering(output), |_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        Self::build(RecordingLauncher::answering(RawOutput::default()), adjust)
    }

    pub fn build(launcher: Arc<RecordingLauncher>, adjust: impl FnOnce(&mut Config)) -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let mut config = Config {
            data_dir: Some(tmp.path().canonicalize().expect("canonical tempdir")),
            ..Config::default()
        };
        adjust(&mut config);

        let gateway = Gateway::with_launcher(&config, launcher.clone()).expect("gateway");
        let session = gateway.bootstrap_session().expect("bootstrap session");
        Self {
            tmp,
            gateway,
            launcher,
            session,
        }
    }

    /// Dispatch against the current session and keep whatever session comes back.
    pub async fn call(&mut self, request: Value) -> Outcome {
        let (next, outcome) = self.gateway.dispatch(&self.session, request).await;
        self.session = next;
        outcome
    }

    /// Dispatch and unwrap a completed body.
    pub async fn completed(&mut self, request: Value) -> Value {
        match self.call(request).await {
            Outcome::Completed(body) => body,
            Outcome::Rejected(e) => panic!("unexpected rejection: {e}"),
        }
    }
}
