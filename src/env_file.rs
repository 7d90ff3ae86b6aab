use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

use crate::config::Config;
use crate::error::DeployResult;

/// Render the secrets file from the configuration and a freshly
/// generated secret key.
#[must_use]
pub fn render(config: &Config, secret_key: &str) -> String {
    let mut out = String::new();
    out.push_str("# Generated by hoist. Contains credentials: keep private.\n");
    let _ = writeln!(out, "SECRET_KEY_BASE={secret_key}");
    let _ = writeln!(out, "POSTGRES_USER={}", config.db_user);
    let _ = writeln!(out, "POSTGRES_PASSWORD={}", config.db_password.expose());
    let _ = writeln!(out, "POSTGRES_DB={}", config.db_name);
    match &config.api_key {
        Some(key) => {
            let _ = writeln!(out, "OPENAI_ACCESS_TOKEN={key}");
        }
        None => out.push_str("# OPENAI_ACCESS_TOKEN=\n"),
    }
    let _ = writeln!(out, "DOMAIN_NAME={}", config.domain);
    let _ = writeln!(out, "ACME_EMAIL={}", config.email);
    out
}

/// Write the secrets file readable by the owner only. A new file is
/// created with mode 0600; an existing one is narrowed before writing.
pub fn write(path: &Path, content: &str) -> DeployResult<()> {
    if path.exists() {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
