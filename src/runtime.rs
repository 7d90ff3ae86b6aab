use crate::cmd::Runner;
use crate::console;
use crate::error::{DeployError, DeployResult};

/// Utility packages installed before Docker.
pub const PREREQUISITES: &[&str] = &["ca-certificates", "curl", "gnupg", "lsb-release", "git"];

/// Docker engine and compose plugin packages.
pub const DOCKER_PACKAGES: &[&str] = &[
    "docker-ce",
    "docker-ce-cli",
    "containerd.io",
    "docker-buildx-plugin",
    "docker-compose-plugin",
];

const KEYRING: &str = "/etc/apt/keyrings/docker.gpg";

const ADD_KEY: &str = "curl -fsSL https://download.docker.com/linux/ubuntu/gpg \
     | sudo gpg --batch --yes --dearmor -o /etc/apt/keyrings/docker.gpg";

const ADD_REPO: &str = "echo \"deb [arch=$(dpkg --print-architecture) \
     signed-by=/etc/apt/keyrings/docker.gpg] \
     https://download.docker.com/linux/ubuntu \
     $(. /etc/os-release && echo \"$VERSION_CODENAME\") stable\" \
     | sudo tee /etc/apt/sources.list.d/docker.list > /dev/null";

/// Run `apt-get` through sudo without interactive dialogs.
pub fn apt_get(runner: &dyn Runner, args: &[&str]) -> DeployResult<()> {
    let mut full = vec!["DEBIAN_FRONTEND=noninteractive", "apt-get"];
    full.extend_from_slice(args);
    runner.run_interactive("sudo", &full)
}

/// Install the given packages with `apt-get install -y`.
pub fn apt_install(runner: &dyn Runner, packages: &[&str]) -> DeployResult<()> {
    let mut args = vec!["install", "-y"];
    args.extend_from_slice(packages);
    apt_get(runner, &args)
}

/// Update the system, install Docker, and verify it can run a
/// container.
pub fn provision(runner: &dyn Runner) -> DeployResult<()> {
    console::section("Installing system packages and Docker");

    console::info("Updating package lists and upgrading the system...");
    apt_get(runner, &["update"])?;
    apt_get(runner, &["upgrade", "-y"])?;

    console::info("Installing prerequisites...");
    apt_install(runner, PREREQUISITES)?;

    console::info("Adding the Docker repository...");
    runner.run("sudo", &["install", "-m", "0755", "-d", "/etc/apt/keyrings"])?;
    runner.run_pipeline(ADD_KEY)?;
    runner.run("sudo", &["chmod", "a+r", KEYRING])?;
    runner.run_pipeline(ADD_REPO)?;
    apt_get(runner, &["update"])?;

    console::info("Installing Docker...");
    apt_install(runner, DOCKER_PACKAGES)?;
    runner.run("sudo", &["systemctl", "enable", "--now", "docker"])?;

    let user = runner.run("id", &["-un"])?;
    runner.run("sudo", &["usermod", "-aG", "docker", &user])?;
    console::info(&format!(
        "Added {user} to the docker group (takes effect after logging in again)"
    ));

    smoke_test(runner)?;
    console::success("Docker installed");
    Ok(())
}

/// Run a throwaway container. Nothing downstream works without
/// this.
pub fn smoke_test(runner: &dyn Runner) -> DeployResult<()> {
    runner
        .run("sudo", &["docker", "run", "--rm", "hello-world"])
        .map(|_| ())
        .map_err(|e| {
            console::error("Docker is installed but cannot run containers");
            DeployError::SmokeTestFailed(e.to_string())
        })
}
