use crate::cmd::Runner;
use crate::console;
use crate::error::DeployResult;

/// ufw application profiles opened by the installer.
pub const ALLOWED_PROFILES: &[&str] = &["OpenSSH", "Nginx Full"];

/// Enable ufw and open SSH plus HTTP/HTTPS. Returns whether the
/// firewall was configured; a missing tool or a failing rule only
/// warns.
pub fn configure(runner: &dyn Runner) -> bool {
    console::section("Configuring firewall");

    if !runner.command_exists("ufw") {
        console::warn("ufw is not installed; skipping firewall setup");
        return false;
    }

    match apply(runner) {
        Ok(()) => {
            console::success("Firewall enabled (SSH, HTTP, HTTPS allowed)");
            true
        }
        Err(e) => {
            console::warn(&format!("Firewall setup incomplete: {e}"));
            false
        }
    }
}

fn apply(runner: &dyn Runner) -> DeployResult<()> {
    // Rules go in before enabling so the SSH session survives.
    for profile in ALLOWED_PROFILES {
        runner.run("sudo", &["ufw", "allow", profile])?;
    }
    runner.run("sudo", &["ufw", "--force", "enable"])?;
    Ok(())
}
