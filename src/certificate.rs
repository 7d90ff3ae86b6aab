use crate::cmd::Runner;
use crate::config::Config;
use crate::console;

/// Cron entry renewing certificates twice a day.
pub const RENEW_ENTRY: &str = "0 0,12 * * * certbot renew --quiet";

/// Whether a certificate ended up installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertOutcome {
    Installed,
    Failed,
}

/// Arguments for a non-interactive certbot run against nginx.
#[must_use]
pub fn certbot_args<'a>(domain: &'a str, email: &'a str) -> Vec<&'a str> {
    vec![
        "certbot",
        "--nginx",
        "-d",
        domain,
        "--non-interactive",
        "--agree-tos",
        "-m",
        email,
        "--redirect",
    ]
}

/// Append the renewal entry unless a `certbot renew` job exists.
/// Returns `None` when nothing needs to change.
#[must_use]
pub fn with_renewal(crontab: &str) -> Option<String> {
    if crontab.contains("certbot renew") {
        return None;
    }
    let mut out = crontab.trim_end().to_string();
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(RENEW_ENTRY);
    out.push('\n');
    Some(out)
}

/// Issue a certificate and schedule renewal. Failures only warn.
pub fn install(runner: &dyn Runner, config: &Config) -> CertOutcome {
    console::section("Installing SSL certificate");

    let args = certbot_args(&config.domain, &config.email);
    if runner.run_interactive("sudo", &args).is_err() {
        console::warn("Certificate issuance failed; the site stays on plain HTTP");
        console::warn(&format!("Retry later with: sudo {}", args.join(" ")));
        return CertOutcome::Failed;
    }
    console::success(&format!("Certificate installed for {}", config.domain));

    schedule_renewal(runner);
    CertOutcome::Installed
}

fn schedule_renewal(runner: &dyn Runner) {
    // `crontab -l` exits non-zero when root has no crontab yet.
    let current = runner.run("sudo", &["crontab", "-l"]).unwrap_or_default();

    match with_renewal(&current) {
        None => console::info("Certificate renewal already scheduled"),
        Some(updated) => {
            match runner.run_with_stdin("sudo", &["crontab", "-"], updated.as_bytes()) {
                Ok(_) => console::success("Scheduled certificate renewal twice daily"),
                Err(e) => console::warn(&format!("Could not schedule renewal: {e}")),
            }
        }
    }
}
