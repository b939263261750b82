use crate::app::status::render_status;
use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use shellgate::gateway::serve_stdio;
use shellgate::{Config, ExecutionResult, Gateway};
use std::io::Write;
use std::process::ExitCode;
use tracing::info;

pub async fn dispatch(cli: Cli, config: Config) -> Result<ExitCode> {
    let gateway = Gateway::from_config(&config)?;
    let mut session = gateway
        .bootstrap_session()
        .context("Failed to create session home")?;
    if let Some(cwd) = &cli.cwd {
        session = gateway.change_directory(&session, &cwd.to_string_lossy())?;
    }

    match cli.command {
        Commands::Exec { command, args } => {
            finish(&gateway.execute(&session, &command, &args).await)
        }
        Commands::ExecRoot { command, args } => {
            finish(&gateway.execute_elevated(&command, &args).await)
        }
        Commands::Install { package, source } => {
            finish(&gateway.install_package(&package, source.as_deref()).await)
        }
        Commands::CheckRoot => {
            let status = gateway.check_privileged_access().await;
            println!(
                "root access: {}",
                if status.has_privilege { "yes" } else { "no" }
            );
            Ok(if status.has_privilege {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Resolve { path } => {
            let resolved = gateway.policy().resolve_path(&session, Some(&path))?;
            println!("{}", resolved.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Cd { path } => {
            let next = gateway.change_directory(&session, &path)?;
            println!("{}", next.cwd().display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::SetupEnv => {
            let (_, layout) = gateway
                .setup_environment()
                .context("Environment setup failed")?;
            println!(
                "Linux environment setup completed at: {}",
                layout.root.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve => {
            let last = serve_stdio(&gateway, session).await?;
            info!(cwd = %last.cwd().display(), "serve finished");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status => {
            println!("{}", render_status(&config, gateway.policy()));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Relay captured output and map the exit code onto the process.
fn finish(result: &ExecutionResult) -> Result<ExitCode> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(result.stdout.as_bytes())?;
    stdout.flush()?;

    if !result.stderr.is_empty() {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(result.stderr.as_bytes())?;
        if !result.stderr.ends_with('\n') {
            stderr.write_all(b"\n")?;
        }
    }

    Ok(ExitCode::from(exit_status_byte(result.exit_code)))
}

/// Codes outside `0..=255` collapse to 1.
fn exit_status_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
