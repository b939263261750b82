//! Request/response boundary.
//!
//! Only malformed requests come back as [`Outcome::Rejected`]. Policy
//! violations, spawn failures and I/O errors are all reported as a completed
//! result with a non-zero `exitCode`.

pub mod requests;
mod serve;

pub use requests::{METHODS, Request};
pub use serve::{serve_lines, serve_stdio};

use crate::config::Config;
use crate::download::Downloader;
use crate::error::{RequestError, SessionError};
use crate::exec::{
    ElevatedCommand, ExecutionEngine, ExecutionEnv, ExecutionResult, ProcessLauncher,
    SystemLauncher,
};
use crate::files;
use crate::security::{Privilege, SecurityPolicy};
use crate::session::{EnvironmentLayout, ShellSession, setup_environment};
use requests::{collect_args, required, required_pair};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// What the caller gets back for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(Value),
    Rejected(RequestError),
}

impl Outcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Wire form: the body itself, or `{"rejected": true, "error": ..}`.
    pub fn into_json(self) -> Value {
        match self {
            Self::Completed(body) => body,
            Self::Rejected(e) => json!({ "rejected": true, "error": e.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivilegeStatus {
    pub has_privilege: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryInfo {
    pub path: String,
    pub home: String,
}

pub struct Gateway {
    policy: SecurityPolicy,
    engine: ExecutionEngine,
    downloader: Downloader,
    data_dir: PathBuf,
    exec_env: ExecutionEnv,
    environment_user: String,
}

impl Gateway {
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Self::with_launcher(config, Arc::new(SystemLauncher))
    }

    pub fn with_launcher(
        config: &Config,
        launcher: Arc<dyn ProcessLauncher>,
    ) -> crate::Result<Self> {
        let exec_env = ExecutionEnv::from(&config.execution);
        Ok(Self {
            policy: SecurityPolicy::from_config(&config.allowlist, &config.paths),
            engine: ExecutionEngine::new(launcher, exec_env.clone()),
            downloader: Downloader::new(&config.download)?,
            data_dir: config.resolved_data_dir(),
            exec_env,
            environment_user: config.environment.user.clone(),
        })
    }

    pub fn policy(&self) -> &SecurityPolicy {
        &self.policy
    }

    /// Initial session: `<data_dir>/home`, created if needed.
    pub fn bootstrap_session(&self) -> std::io::Result<ShellSession> {
        ShellSession::bootstrap(&self.data_dir)
    }

    pub async fn execute(
        &self,
        session: &ShellSession,
        command: &str,
        args: &[String],
    ) -> ExecutionResult {
        match self
            .policy
            .validate_command(command, args, Privilege::Standard)
        {
            Ok(validated) => self.engine.execute(&validated, session).await,
            Err(violation) => violation.into(),
        }
    }

    pub async fn execute_elevated(&self, command: &str, args: &[String]) -> ExecutionResult {
        let elevated = self
            .policy
            .validate_command(command, args, Privilege::Elevated)
            .and_then(|validated| ElevatedCommand::from_validated(&validated));
        match elevated {
            Ok(elevated) => self.engine.execute_elevated(&elevated).await,
            Err(violation) => violation.into(),
        }
    }

    pub async fn install_package(&self, package_name: &str, source: Option<&str>) -> ExecutionResult {
        self.engine
            .install_package(&self.policy, package_name, source)
            .await
    }

    pub async fn check_privileged_access(&self) -> PrivilegeStatus {
        PrivilegeStatus {
            has_privilege: self.engine.check_privileged_access().await,
        }
    }

    pub fn change_directory(
        &self,
        session: &ShellSession,
        path: &str,
    ) -> Result<ShellSession, SessionError> {
        session.change_directory(&self.policy, path)
    }

    pub fn current_directory(session: &ShellSession) -> DirectoryInfo {
        DirectoryInfo {
            path: session.cwd().display().to_string(),
            home: session.home().display().to_string(),
        }
    }

    pub fn setup_environment(&self) -> std::io::Result<(ShellSession, EnvironmentLayout)> {
        setup_environment(
            &self.data_dir,
            &self.environment_user,
            &self.exec_env.term,
            &self.exec_env.lang,
        )
    }

    /// Parse and run one request, returning the session the next request
    /// should see.
    pub async fn dispatch(&self, session: &ShellSession, value: Value) -> (ShellSession, Outcome) {
        self.run_parsed(session, Request::from_value(value)).await
    }

    /// [`Gateway::dispatch`] for one raw line of the JSON-lines protocol.
    pub async fn dispatch_line(&self, session: &ShellSession, line: &str) -> (ShellSession, Outcome) {
        self.run_parsed(session, Request::from_line(line)).await
    }

    async fn run_parsed(
        &self,
        session: &ShellSession,
        parsed: Result<Request, RequestError>,
    ) -> (ShellSession, Outcome) {
        let request = match parsed {
            Ok(request) => request,
            Err(e) => return reject(session, e),
        };
        match self.handle(session, request).await {
            Ok((next, body)) => (next, Outcome::Completed(body)),
            Err(e) => reject(session, e),
        }
    }

    #[allow(clippy::too_many_lines)]
    pub async fn handle(
        &self,
        session: &ShellSession,
        request: Request,
    ) -> Result<(ShellSession, Value), RequestError> {
        let same = |body: Value| -> Result<(ShellSession, Value), RequestError> {
            Ok((session.clone(), body))
        };

        match request {
            Request::ExecuteCommand { command, args } => {
                let command = required(command, "Command is required")?;
                let result = self.execute(session, &command, &collect_args(args)).await;
                same(to_json(&result))
            }
            Request::ExecuteRootCommand { command, args } => {
                let command = required(command, "Command is required")?;
                let result = self.execute_elevated(&command, &collect_args(args)).await;
                same(to_json(&result))
            }
            Request::InstallPackage {
                package_name,
                source,
            } => {
                let package_name = required(package_name, "Package name is required")?;
                let result = self.install_package(&package_name, source.as_deref()).await;
                same(to_json(&result))
            }
            Request::CheckRootAccess => {
                let status = self.check_privileged_access().await;
                same(json!({
                    "hasPrivilege": status.has_privilege,
                    "hasRoot": status.has_privilege,
                }))
            }
            Request::ChangeDirectory { path } => {
                let path = required(path, "Path is required")?;
                match self.change_directory(session, &path) {
                    Ok(next) => {
                        let body = json!({ "path": next.cwd().display().to_string() });
                        Ok((next, body))
                    }
                    Err(e) => {
                        warn!("change directory failed: {e}");
                        same(failure(e))
                    }
                }
            }
            Request::GetCurrentDirectory => same(to_json(&Self::current_directory(session))),
            Request::SetupLinuxEnvironment => match self.setup_environment() {
                Ok((next, layout)) => {
                    info!(home = %layout.home.display(), "session moved into linux environment");
                    let mut body = to_json(&ExecutionResult::success(format!(
                        "Linux environment setup completed at: {}",
                        layout.root.display()
                    )));
                    body["linuxRoot"] = json!(layout.root.display().to_string());
                    body["home"] = json!(layout.home.display().to_string());
                    Ok((next, body))
                }
                Err(e) => same(failure(format!("Environment setup failed: {e}"))),
            },
            Request::ListDirectory { path } => {
                same(file_json(files::list_directory(&self.policy, session, path.as_deref()).await))
            }
            Request::ReadFile { path } => {
                let path = required(path, "Path is required")?;
                same(file_json(files::read_file(&self.policy, session, &path).await))
            }
            Request::WriteFile {
                path,
                content,
                append,
            } => {
                let path = required(path, "Path is required")?;
                let content = content.unwrap_or_default();
                let append = append.unwrap_or(false);
                same(file_json(
                    files::write_file(&self.policy, session, &path, &content, append).await,
                ))
            }
            Request::DeleteFile { path, recursive } => {
                let path = required(path, "Path is required")?;
                let recursive = recursive.unwrap_or(false);
                same(file_json(
                    files::delete_path(&self.policy, session, &path, recursive).await,
                ))
            }
            Request::CreateDirectory { path, recursive } => {
                let path = required(path, "Path is required")?;
                let recursive = recursive.unwrap_or(true);
                same(file_json(
                    files::create_directory(&self.policy, session, &path, recursive).await,
                ))
            }
            Request::CopyFile {
                source,
                destination,
            } => {
                let (source, destination) =
                    required_pair(source, destination, "Source and destination are required")?;
                same(file_json(
                    files::copy_file(&self.policy, session, &source, &destination).await,
                ))
            }
            Request::MoveFile {
                source,
                destination,
            } => {
                let (source, destination) =
                    required_pair(source, destination, "Source and destination are required")?;
                same(file_json(
                    files::move_file(&self.policy, session, &source, &destination).await,
                ))
            }
            Request::DownloadFile { url, destination } => {
                let (url, destination) =
                    required_pair(url, destination, "URL and destination are required")?;
                let outcome = self
                    .downloader
                    .download(&self.policy, session, &url, &destination)
                    .await;
                same(to_json(&outcome))
            }
        }
    }
}

fn reject(session: &ShellSession, e: RequestError) -> (ShellSession, Outcome) {
    warn!("rejected request: {e}");
    (session.clone(), Outcome::Rejected(e))
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|e| failure(format!("failed to encode response: {e}")))
}

fn failure(message: impl ToString) -> Value {
    let result = ExecutionResult::failure(message.to_string());
    json!({
        "output": result.stdout,
        "error": result.stderr,
        "exitCode": result.exit_code,
    })
}

fn file_json<T: Serialize, E: std::fmt::Display>(result: std::result::Result<T, E>) -> Value {
    match result {
        Ok(body) => to_json(&body),
        Err(e) => {
            warn!("file operation failed: {e}");
            failure(e)
        }
    }
}
