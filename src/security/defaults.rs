/// Built-in program basenames the gateway may execute.
///
/// Resolution of the actual binary is left to `PATH`. Programs that can run
/// other programs without any shell metacharacter (`env`, `xargs`, `sed`'s
/// `e` command, `awk`'s `system()`) and all interpreters are absent.
#[must_use]
pub fn default_allowed_commands() -> Vec<String> {
    [
        // File listing / info
        "ls", "cat", "echo", "pwd", "whoami", "date", "uname", "df", "du", "ps", "top", "free",
        "uptime", "which", "id", "printenv", "hostname", "arch", "nproc",
        // File operations
        "cp", "mv", "rm", "mkdir", "rmdir", "touch", "chmod", "chown", "find",
        // Text processing
        "head", "tail", "wc", "sort", "uniq", "grep", "cut", "tr", "tee",
        // Networking diagnostics
        "ping", "curl", "wget", "netstat", "ifconfig", "ip",
        // Package management
        "pkg", "apt", "apt-get", "dpkg",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Package managers the install policy may route through the escalation shell.
#[must_use]
pub fn default_package_managers() -> Vec<String> {
    ["pkg", "apt-get", "apt", "pacman", "yum", "dpkg"]
        .into_iter()
        .map(String::from)
        .collect()
}
