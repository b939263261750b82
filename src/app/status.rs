use shellgate::Config;
use shellgate::security::SecurityPolicy;

pub fn render_status(config: &Config, policy: &SecurityPolicy) -> String {
    let resolve_mode = match config.paths.resolve_mode {
        shellgate::security::PathResolveMode::Lenient => "lenient",
        shellgate::security::PathResolveMode::Strict => "strict",
    };

    [
        "◆ shellgate status".to_string(),
        String::new(),
        format!("Version     {}", env!("CARGO_PKG_VERSION")),
        format!("Config      {}", config.config_path.display()),
        format!("Data dir    {}", config.resolved_data_dir().display()),
        format!("Log level   {}", config.log_level),
        String::new(),
        format!("Allowlist   {} commands", policy.allowlist.len()),
        format!("  disabled          {}", list_or_none(&config.allowlist.disabled)),
        format!(
            "  unprivileged-only {}",
            list_or_none(&config.allowlist.unprivileged_only)
        ),
        format!("Paths       resolve_mode={resolve_mode}"),
        format!(
            "Download    timeout={}s, max_bytes={}",
            config.download.timeout_secs, config.download.max_bytes
        ),
        format!(
            "Execution   TERM={}, LANG={}",
            config.execution.term, config.execution.lang
        ),
    ]
    .join("\n")
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
