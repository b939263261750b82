//! Filesystem operations exposed at the gateway boundary.
//!
//! Plain I/O wrappers. Reads resolve through the session; every mutation
//! first rejects literal `..` in the raw input.

use crate::error::FileOpError;
use crate::security::SecurityPolicy;
use crate::session::ShellSession;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Largest file `read_file` returns.
pub const MAX_READ_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub is_file: bool,
    pub size: u64,
    pub modified: String,
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryListing {
    pub path: String,
    pub files: Vec<FileEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileContent {
    pub content: String,
    pub path: String,
    pub size: u64,
}

/// Result of a single-path mutation.
#[derive(Debug, Clone, Serialize)]
pub struct PathOutcome {
    pub success: bool,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Result of a copy or move.
#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    pub success: bool,
    pub source: String,
    pub destination: String,
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn format_modified(meta: &std::fs::Metadata) -> String {
    meta.modified()
        .map(|time| {
            DateTime::<Local>::from(time)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default()
}

#[cfg(unix)]
fn mode_bits(meta: &std::fs::Metadata) -> (bool, bool, bool) {
    use std::os::unix::fs::PermissionsExt;
    let mode = meta.permissions().mode();
    (mode & 0o444 != 0, mode & 0o222 != 0, mode & 0o111 != 0)
}

#[cfg(not(unix))]
fn mode_bits(meta: &std::fs::Metadata) -> (bool, bool, bool) {
    (true, !meta.permissions().readonly(), false)
}

async fn ensure_parent(path: &Path) -> Result<(), FileOpError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

async fn require_exists(path: &Path) -> Result<std::fs::Metadata, FileOpError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(FileOpError::NotFound(display(path)))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list_directory(
    policy: &SecurityPolicy,
    session: &ShellSession,
    path: Option<&str>,
) -> Result<DirectoryListing, FileOpError> {
    let resolved = policy.resolve_path(session, path)?;
    let meta = require_exists(&resolved).await?;
    if !meta.is_dir() {
        return Err(FileOpError::NotADirectory(display(&resolved)));
    }

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(&resolved).await?;
    while let Some(entry) = entries.next_entry().await? {
        // Entries can vanish between listing and stat.
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        let (readable, writable, executable) = mode_bits(&meta);
        files.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: display(&entry.path()),
            is_directory: meta.is_dir(),
            is_file: meta.is_file(),
            size: meta.len(),
            modified: format_modified(&meta),
            readable,
            writable,
            executable,
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(DirectoryListing {
        path: display(&resolved),
        count: files.len(),
        files,
    })
}

pub async fn read_file(
    policy: &SecurityPolicy,
    session: &ShellSession,
    path: &str,
) -> Result<FileContent, FileOpError> {
    let resolved = policy.resolve_path(session, Some(path))?;
    let meta = require_exists(&resolved).await?;
    if meta.len() > MAX_READ_BYTES {
        return Err(FileOpError::TooLarge {
            path: display(&resolved),
            max_bytes: MAX_READ_BYTES,
        });
    }

    let bytes = tokio::fs::read(&resolved).await?;
    Ok(FileContent {
        content: String::from_utf8_lossy(&bytes).into_owned(),
        path: display(&resolved),
        size: meta.len(),
    })
}

pub async fn write_file(
    policy: &SecurityPolicy,
    session: &ShellSession,
    path: &str,
    content: &str,
    append: bool,
) -> Result<PathOutcome, FileOpError> {
    use tokio::io::AsyncWriteExt;

    let resolved = policy.resolve_mutation_target(session, path)?;
    ensure_parent(&resolved).await?;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(&resolved)
        .await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;

    let size = tokio::fs::metadata(&resolved).await?.len();
    info!(path = %resolved.display(), size, append, "wrote file");
    Ok(PathOutcome {
        success: true,
        path: display(&resolved),
        size: Some(size),
    })
}

pub async fn delete_path(
    policy: &SecurityPolicy,
    session: &ShellSession,
    path: &str,
    recursive: bool,
) -> Result<PathOutcome, FileOpError> {
    let resolved = policy.resolve_mutation_target(session, path)?;
    let meta = require_exists(&resolved).await?;

    let removed = if meta.is_dir() {
        if recursive {
            tokio::fs::remove_dir_all(&resolved).await
        } else {
            tokio::fs::remove_dir(&resolved).await
        }
    } else {
        tokio::fs::remove_file(&resolved).await
    };

    if let Err(e) = &removed {
        tracing::warn!(path = %resolved.display(), "delete failed: {e}");
    }
    Ok(PathOutcome {
        success: removed.is_ok(),
        path: display(&resolved),
        size: None,
    })
}

pub async fn create_directory(
    policy: &SecurityPolicy,
    session: &ShellSession,
    path: &str,
    recursive: bool,
) -> Result<PathOutcome, FileOpError> {
    let resolved = policy.resolve_mutation_target(session, path)?;
    let created = if recursive {
        tokio::fs::create_dir_all(&resolved).await
    } else {
        tokio::fs::create_dir(&resolved).await
    };

    let exists = tokio::fs::metadata(&resolved)
        .await
        .is_ok_and(|meta| meta.is_dir());
    Ok(PathOutcome {
        success: created.is_ok() || exists,
        path: display(&resolved),
        size: None,
    })
}

async fn transfer_targets(
    policy: &SecurityPolicy,
    session: &ShellSession,
    source: &str,
    destination: &str,
) -> Result<(PathBuf, PathBuf), FileOpError> {
    let resolved_source = policy.resolve_mutation_target(session, source)?;
    let resolved_dest = policy.resolve_mutation_target(session, destination)?;
    require_exists(&resolved_source).await?;
    ensure_parent(&resolved_dest).await?;
    Ok((resolved_source, resolved_dest))
}

pub async fn copy_file(
    policy: &SecurityPolicy,
    session: &ShellSession,
    source: &str,
    destination: &str,
) -> Result<TransferOutcome, FileOpError> {
    let (source, destination) = transfer_targets(policy, session, source, destination).await?;
    tokio::fs::copy(&source, &destination).await?;
    Ok(TransferOutcome {
        success: true,
        source: display(&source),
        destination: display(&destination),
    })
}

pub async fn move_file(
    policy: &SecurityPolicy,
    session: &ShellSession,
    source: &str,
    destination: &str,
) -> Result<TransferOutcome, FileOpError> {
    let (source, destination) = transfer_targets(policy, session, source, destination).await?;
    let renamed = tokio::fs::rename(&source, &destination).await;
    Ok(TransferOutcome {
        success: renamed.is_ok(),
        source: display(&source),
        destination: display(&destination),
    })
}
