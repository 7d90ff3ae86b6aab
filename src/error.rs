use std::process::ExitStatus;

pub type DeployResult<T> = Result<T, DeployError>;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("command failed: {command}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("installation cancelled")]
    Aborted,

    #[error("do not run as root; use a regular user with sudo access")]
    RunningAsRoot,

    #[error("sudo is not available without a password prompt; run `sudo -v` first")]
    SudoUnavailable,

    #[error("docker smoke test failed: {0}")]
    SmokeTestFailed(String),

    #[error("deployment manifest missing after download: {0}")]
    ManifestMissing(String),

    #[error("no running containers after deploy in {0}")]
    NotRunning(String),

    #[error("nginx configuration test failed: {0}")]
    ProxyConfigInvalid(String),

    #[error("environment variable missing: {0}")]
    EnvMissing(String),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
