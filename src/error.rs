use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `shellgate`.
///
/// Only [`RequestError`] ever crosses the gateway boundary as a rejection.
/// Every other variant is flattened into an
/// [`ExecutionResult`](crate::exec::ExecutionResult) with a non-zero exit code
/// before it reaches the caller.
#[derive(Debug, Error)]
pub enum GatewayError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Malformed requests ───────────────────────────────────────────────
    #[error("request: {0}")]
    Request(#[from] RequestError),

    // ── Security / Policy ───────────────────────────────────────────────
    #[error("policy: {0}")]
    Policy(#[from] PolicyViolation),

    // ── Session state ───────────────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── File operations ─────────────────────────────────────────────────
    #[error("file: {0}")]
    File(#[from] FileOpError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Request errors ──────────────────────────────────────────────────────────

/// A request that cannot be interpreted at all. These are the only failures
/// reported as a rejection instead of a result record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{0}")]
    MissingField(&'static str),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("malformed request: {0}")]
    Malformed(String),
}

// ─── Policy violations ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Command not allowed. Only safe commands are permitted.")]
    CommandNotAllowed,

    #[error("Root command not allowed. Only safe commands are permitted.")]
    ElevatedCommandNotAllowed,

    #[error("Invalid arguments. Arguments contain forbidden characters.")]
    UnsafeArguments,

    #[error(
        "Invalid package name. Only alphanumeric characters, dashes, and underscores are allowed."
    )]
    InvalidPackageName,

    #[error("Package manager not allowed")]
    PackageManagerNotAllowed,

    #[error("Invalid path: path traversal not allowed")]
    PathTraversal,

    #[error("Invalid path: cannot resolve {0}")]
    UnresolvablePath(String),

    #[error("Only HTTPS URLs are allowed for security")]
    InsecureUrl,
}

// ─── Session errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Directory not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── File operation errors ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FileOpError {
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("File too large (max {max_bytes} bytes): {path}")]
    TooLarge { path: String, max_bytes: u64 },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;
