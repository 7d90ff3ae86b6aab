use std::fmt::Write as _;
use std::path::Path;

use crate::cmd::Runner;
use crate::config::Config;
use crate::console;
use crate::deploy;
use crate::prompt::{Prompter, parse_yes};

/// Running state of each subsystem after the install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub nginx: bool,
    pub containers: bool,
    /// `None` when SSL was not requested.
    pub certificate: Option<bool>,
}

impl Report {
    /// Query nginx, the compose project, and the certificate.
    #[must_use]
    pub fn collect(runner: &dyn Runner, domain: &str, install_dir: &Path, ssl: bool) -> Self {
        let nginx = runner
            .run("systemctl", &["is-active", "--quiet", "nginx"])
            .is_ok();
        let containers = deploy::is_running(runner, install_dir);
        let certificate = ssl.then(|| {
            runner
                .run("sudo", &["test", "-d", &format!("/etc/letsencrypt/live/{domain}")])
                .is_ok()
        });
        Self {
            nginx,
            containers,
            certificate,
        }
    }

    /// Whether the site is served over HTTPS.
    #[must_use]
    pub fn https(&self) -> bool {
        self.certificate == Some(true)
    }

    pub fn print(&self) {
        console::section("Service status");
        eprintln!("  {} nginx", console::check_mark(self.nginx));
        eprintln!("  {} application containers", console::check_mark(self.containers));
        if let Some(cert) = self.certificate {
            eprintln!("  {} SSL certificate", console::check_mark(cert));
        }
    }
}

/// Commands printed at the end of the install, relative to the
/// install directory.
pub const MANAGEMENT_COMMANDS: &[(&str, &str)] = &[
    ("View logs", "sudo docker compose logs -f"),
    ("Restart", "sudo docker compose restart"),
    ("Stop", "sudo docker compose down"),
    ("Update", "sudo docker compose pull && sudo docker compose up -d"),
    ("Container status", "sudo docker compose ps"),
    ("nginx status", "sudo systemctl status nginx"),
    ("nginx error log", "sudo tail -f /var/log/nginx/error.log"),
    ("Renew certificates", "sudo certbot renew --dry-run"),
];

/// Final human-readable summary.
#[must_use]
pub fn summary(config: &Config, https: bool) -> String {
    let scheme = if https { "https" } else { "http" };
    let dir = config.install_dir.display();
    let mut out = String::new();

    let _ = writeln!(out, "Installation complete!");
    let _ = writeln!(out);
    let _ = writeln!(out, "Access your application:");
    let _ = writeln!(out, "  {scheme}://{}", config.domain);
    if config.install_ssl && !https {
        let _ = writeln!(
            out,
            "  (SSL was requested but is not active; run `sudo certbot --nginx -d {}` once DNS points here)",
            config.domain
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "First run:");
    let _ = writeln!(out, "  1. Open the URL above and create the administrator account");
    let _ = writeln!(out, "  2. Log out and back in so docker works without sudo");
    let _ = writeln!(out);
    let _ = writeln!(out, "Files:");
    let _ = writeln!(out, "  Install directory: {dir}");
    let _ = writeln!(out, "  Configuration:     {}", config.env_path().display());
    let _ = writeln!(
        out,
        "  nginx site:        /etc/nginx/sites-available/{}",
        config.domain
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Management (run in {dir}):");
    for (label, command) in MANAGEMENT_COMMANDS {
        let _ = writeln!(out, "  {label:<20} {command}");
    }
    out
}

/// Offer an immediate reboot. Only an explicit `y` reboots; an
/// unreadable answer counts as no.
pub fn offer_reboot(prompter: &mut dyn Prompter, runner: &dyn Runner) {
    let answer = match prompter.ask("Reboot now to apply group changes? (y/N)") {
        Ok(answer) => answer,
        Err(e) => {
            console::warn(&format!("Could not read the reboot answer: {e}"));
            String::new()
        }
    };
    if parse_yes(&answer) {
        console::info("Rebooting...");
        if let Err(e) = runner.run("sudo", &["reboot"]) {
            console::warn(&format!("Reboot failed: {e}"));
        }
    } else {
        console::info("Remember to log out and back in (or reboot) before using docker without sudo");
    }
}
