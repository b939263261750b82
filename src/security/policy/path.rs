use std::path::{Path, PathBuf};

use super::SecurityPolicy;
use super::types::PathResolveMode;
use crate::error::PolicyViolation;
use crate::session::ShellSession;

/// Reject raw input that contains a literal `..` or a null byte.
///
/// Mutating operations call this before resolution, so the check holds even
/// when canonicalization fails open.
pub fn reject_traversal(path: &str) -> Result<(), PolicyViolation> {
    if path.contains("..") || path.contains('\0') {
        return Err(PolicyViolation::PathTraversal);
    }
    Ok(())
}

impl SecurityPolicy {
    /// Resolve a possibly relative, possibly home-relative path against the
    /// session.
    ///
    /// - empty or absent: the session's cwd
    /// - absolute: returned unchanged
    /// - `~` or `~/...`: expanded against the session's home, not canonicalized
    /// - anything else: `cwd/path`, canonicalized; see [`PathResolveMode`] for
    ///   what happens when canonicalization fails
    pub fn resolve_path(
        &self,
        session: &ShellSession,
        path: Option<&str>,
    ) -> Result<PathBuf, PolicyViolation> {
        let Some(path) = path.filter(|p| !p.is_empty()) else {
            return Ok(session.cwd().to_path_buf());
        };

        if path.starts_with('/') {
            return Ok(PathBuf::from(path));
        }

        if path == "~" {
            return Ok(session.home().to_path_buf());
        }
        if let Some(stripped) = path.strip_prefix("~/") {
            let mut expanded = session.home().as_os_str().to_owned();
            expanded.push("/");
            expanded.push(stripped);
            return Ok(PathBuf::from(expanded));
        }

        let joined = session.cwd().join(path);
        match joined.canonicalize() {
            Ok(canonical) => Ok(canonical),
            Err(e) => match self.resolve_mode {
                PathResolveMode::Lenient => {
                    tracing::debug!(
                        path = %joined.display(),
                        "canonicalization failed ({e}); using raw path"
                    );
                    Ok(joined)
                }
                PathResolveMode::Strict => canonicalize_parent(&joined)
                    .ok_or_else(|| PolicyViolation::UnresolvablePath(path.to_string())),
            },
        }
    }

    /// [`reject_traversal`] followed by [`SecurityPolicy::resolve_path`].
    pub fn resolve_mutation_target(
        &self,
        session: &ShellSession,
        path: &str,
    ) -> Result<PathBuf, PolicyViolation> {
        reject_traversal(path)?;
        self.resolve_path(session, Some(path))
    }
}

/// Canonical parent joined with the final component, for targets that do not
/// exist yet.
fn canonicalize_parent(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?;
    let parent = path.parent()?.canonicalize().ok()?;
    Some(parent.join(file_name))
}
