use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::app::App;
use crate::cmd::Runner;
use crate::compose;
use crate::config::Config;
use crate::console;
use crate::env_file;
use crate::error::{DeployError, DeployResult};
use crate::secrets;

/// Default wait between `docker compose up` and the status query.
pub const SETTLE: Duration = Duration::from_secs(30);

/// Deploys the compose stack into the install directory.
///
/// Every `docker compose` call runs with the install directory as
/// working directory, through sudo since docker group membership
/// only applies to new login sessions.
pub struct ComposeDeployer {
    settle: Duration,
}

impl ComposeDeployer {
    #[must_use]
    pub const fn new() -> Self {
        Self { settle: SETTLE }
    }

    #[must_use]
    pub const fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Create the directory, fetch and adjust the manifest, write
    /// the secrets file, then pull and start the containers.
    pub fn deploy(&self, runner: &dyn Runner, app: &App, config: &Config) -> DeployResult<()> {
        console::section("Deploying the application");

        let dir = &config.install_dir;
        fs::create_dir_all(dir)?;
        console::info(&format!("Install directory: {}", dir.display()));

        let manifest = download_manifest(runner, app, dir)?;

        let secret_key = secrets::generate_secret_key();
        env_file::write(&config.env_path(), &env_file::render(config, &secret_key))?;
        console::success(&format!("Wrote {}", config.env_path().display()));

        restrict_to_loopback(&manifest, app.port)?;

        console::info("Pulling container images (this can take a while)...");
        compose_interactive(runner, dir, &["pull"])?;

        console::info("Starting containers...");
        compose_interactive(runner, dir, &["up", "-d"])?;

        console::info(&format!(
            "Waiting {}s for containers to settle...",
            self.settle.as_secs()
        ));
        thread::sleep(self.settle);

        if is_running(runner, dir) {
            console::success("Containers are running");
            Ok(())
        } else {
            console::error("Containers are not running. Recent logs:");
            if let Err(e) = compose_interactive(runner, dir, &["logs", "--tail", "100"]) {
                console::warn(&format!("Could not show container logs: {e}"));
            }
            Err(DeployError::NotRunning(dir.display().to_string()))
        }
    }
}

impl Default for ComposeDeployer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch the manifest into `dir`. The file must exist afterwards.
pub fn download_manifest(runner: &dyn Runner, app: &App, dir: &Path) -> DeployResult<PathBuf> {
    let path = dir.join(&app.manifest_file);
    let target = path.to_string_lossy();

    console::info(&format!("Downloading {}", app.manifest_url));
    let fetched = runner.run("curl", &["-fsSL", "-o", &target, &app.manifest_url]);

    if fetched.is_err() || !path.is_file() {
        console::error("Failed to download the deployment manifest");
        return Err(DeployError::ManifestMissing(target.into_owned()));
    }
    Ok(path)
}

/// Bind the application port to 127.0.0.1 so nginx is the only
/// public entry point. A manifest without the mapping is left as is.
pub fn restrict_to_loopback(path: &Path, port: u16) -> DeployResult<()> {
    let original = fs::read_to_string(path)?;
    let (rewritten, changed) = compose::bind_loopback(&original, port);

    if changed {
        fs::write(path, &rewritten)?;
        console::info(&format!("Bound port {port} to 127.0.0.1"));
    }

    match compose::published_ports(&rewritten) {
        Ok(ports) => {
            for p in ports
                .iter()
                .filter(|p| p.container_port == port && p.on_all_interfaces())
            {
                console::warn(&format!(
                    "service {} still publishes port {port} on all interfaces",
                    p.service
                ));
            }
        }
        Err(e) => console::warn(&format!("Could not inspect the manifest: {e}")),
    }
    Ok(())
}

fn compose_args<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut full = vec!["docker", "compose"];
    full.extend_from_slice(args);
    full
}

fn compose_interactive(runner: &dyn Runner, dir: &Path, args: &[&str]) -> DeployResult<()> {
    runner.run_interactive_in(dir, "sudo", &compose_args(args))
}

/// Whether at least one container of the project is running.
#[must_use]
pub fn is_running(runner: &dyn Runner, dir: &Path) -> bool {
    runner
        .run_in(dir, "sudo", &compose_args(&["ps", "--format", "json"]))
        .and_then(|out| compose::parse_ps(&out))
        .is_ok_and(|entries| entries.iter().any(compose::PsEntry::is_running))
}
