//! Interactive single-host provisioning.
//!
//! Hoist turns a fresh Ubuntu server into a running deployment of
//! a compose-packaged web application: Docker, an nginx reverse
//! proxy, generated secrets, an optional Let's Encrypt certificate
//! and an optional ufw firewall. It replaces the usual
//! `curl | bash` installer with a typed, testable pipeline.
//!
//! # Overview
//!
//! A run is a [`Pipeline`] over an [`App`] profile:
//!
//! 1. **Collect** - prompt for and validate every value into an
//!    immutable [`Config`] before touching the system
//! 2. **Preflight** - refuse root, require sudo, compare DNS with
//!    this host's public address
//! 3. **Runtime** - apt upgrade, Docker engine and compose plugin,
//!    smoke test
//! 4. **Proxy** - render the [`Nginx`] site, `nginx -t`, restart
//! 5. **Deploy** - download the manifest, write `.env`, bind the
//!    app port to loopback, `docker compose up -d`
//! 6. **Certificate** (optional) - certbot with renewal cron
//! 7. **Firewall** (optional) - ufw with SSH and HTTP/HTTPS
//! 8. **Status** - per-subsystem report, summary, reboot prompt
//!
//! Every external program is invoked through the
//! [`Runner`](cmd::Runner) trait and every answer comes from a
//! [`Prompter`](prompt::Prompter), so the whole pipeline can be
//! exercised without a server.
//!
//! # Example
//!
//! ```rust,no_run
//! use hoist::{App, Pipeline};
//!
//! fn main() -> anyhow::Result<()> {
//!     Pipeline::new(App::chatwoot()).run()?;
//!     Ok(())
//! }
//! ```
//!
//! ```sh
//! # Interactive install
//! hoist install
//!
//! # Preview the nginx site without changing anything
//! hoist preview --domain chat.example.com
//!
//! # Re-check a finished install
//! hoist status --domain chat.example.com --ssl
//! ```

#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod app;
pub mod certificate;
pub mod cmd;
pub mod compose;
pub mod config;
pub mod console;
pub mod deploy;
pub mod env_file;
pub mod error;
pub mod firewall;
pub mod nginx;
pub mod nginx_conf;
pub mod pipeline;
pub mod preflight;
pub mod prompt;
pub mod proxy;
pub mod runtime;
pub mod secrets;
pub mod status;

pub use app::App;
pub use config::Config;
pub use deploy::ComposeDeployer;
pub use nginx::Nginx;
pub use pipeline::Pipeline;
