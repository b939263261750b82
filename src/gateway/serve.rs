use super::Gateway;
use crate::session::ShellSession;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// One JSON request per input line, one JSON response per output line.
///
/// The session returned by each request is handed to the next; the final
/// session is returned when input ends.
pub async fn serve_lines<R, W>(
    gateway: &Gateway,
    mut session: ShellSession,
    reader: R,
    mut writer: W,
) -> Result<ShellSession>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled: u64 = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (next, outcome) = gateway.dispatch_line(&session, line).await;
        session = next;
        handled += 1;
        debug!(handled, rejected = outcome.is_rejected(), "request done");

        let mut encoded =
            serde_json::to_string(&outcome.into_json()).context("Failed to encode response")?;
        encoded.push('\n');
        writer
            .write_all(encoded.as_bytes())
            .await
            .context("Failed to write response")?;
        writer.flush().await.context("Failed to write response")?;
    }

    info!(handled, "input closed");
    Ok(session)
}

/// [`serve_lines`] over the process's stdin and stdout.
pub async fn serve_stdio(gateway: &Gateway, session: ShellSession) -> Result<ShellSession> {
    info!(cwd = %session.cwd().display(), "serving requests on stdin");
    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    serve_lines(gateway, session, reader, tokio::io::stdout()).await
}
