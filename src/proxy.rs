use crate::cmd::Runner;
use crate::console;
use crate::error::{DeployError, DeployResult};
use crate::nginx::{Nginx, SITES_ENABLED};
use crate::nginx_conf;
use crate::runtime;

/// nginx plus certbot and its nginx plugin.
pub const PACKAGES: &[&str] = &["nginx", "certbot", "python3-certbot-nginx"];

/// Install nginx, write the site, validate it, then restart.
///
/// The daemon is only restarted once `nginx -t` accepts the new
/// configuration.
pub fn configure(runner: &dyn Runner, site: &Nginx) -> DeployResult<()> {
    console::section("Configuring nginx");

    console::info("Installing nginx and certbot...");
    runtime::apt_install(runner, PACKAGES)?;

    write_site(runner, site)?;
    validate(runner)?;

    runner.run("sudo", &["systemctl", "restart", "nginx"])?;
    runner.run("sudo", &["systemctl", "enable", "nginx"])?;
    console::success(&format!("nginx is serving {}", site.server_name));
    Ok(())
}

/// Write the site into `sites-available`, enable it, and drop the
/// stock default site.
pub fn write_site(runner: &dyn Runner, site: &Nginx) -> DeployResult<()> {
    let content = nginx_conf::render(site);
    let available = site.available_path();
    let enabled = site.enabled_path();

    runner.run_with_stdin("sudo", &["tee", &available], content.as_bytes())?;
    runner.run("sudo", &["ln", "-sf", &available, &enabled])?;
    runner.run("sudo", &["rm", "-f", &format!("{SITES_ENABLED}/default")])?;
    console::info(&format!("Wrote {available}"));
    Ok(())
}

/// Run nginx's own syntax check.
pub fn validate(runner: &dyn Runner) -> DeployResult<()> {
    runner.run("sudo", &["nginx", "-t"]).map(|_| ()).map_err(|e| {
        console::error("nginx configuration test failed; nginx was not restarted");
        DeployError::ProxyConfigInvalid(e.to_string())
    })
}
