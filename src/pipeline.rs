use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::app::App;
use crate::certificate::{self, CertOutcome};
use crate::cmd::{Runner, System};
use crate::config::{self, Config};
use crate::console;
use crate::deploy::{ComposeDeployer, SETTLE};
use crate::error::{DeployError, DeployResult};
use crate::firewall;
use crate::nginx::Nginx;
use crate::nginx_conf;
use crate::preflight;
use crate::prompt::{Prompter, Terminal};
use crate::proxy;
use crate::runtime;
use crate::status::{self, Report};

/// What a completed install left behind.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub config: Config,
    pub certificate: Option<CertOutcome>,
    pub firewall: Option<bool>,
    pub report: Report,
    pub summary: String,
}

/// Installation pipeline: collect, check, provision, proxy,
/// deploy, then the optional certificate and firewall stages.
pub struct Pipeline {
    app: App,
    deployer: ComposeDeployer,
}

impl Pipeline {
    #[must_use]
    pub const fn new(app: App) -> Self {
        Self {
            app,
            deployer: ComposeDeployer::new(),
        }
    }

    #[must_use]
    pub fn settle(mut self, settle: Duration) -> Self {
        self.deployer = self.deployer.settle(settle);
        self
    }

    #[must_use]
    pub fn manifest_url(mut self, url: &str) -> Self {
        self.app = self.app.manifest_url(url);
        self
    }

    /// Parse CLI arguments and dispatch the appropriate command.
    pub fn run(self) -> DeployResult<()> {
        let cli = Cli::parse();

        match cli.command {
            Command::Install {
                manifest_url,
                settle_secs,
            } => {
                let mut pipeline = self.settle(Duration::from_secs(settle_secs));
                if let Some(url) = manifest_url {
                    pipeline = pipeline.manifest_url(&url);
                }
                pipeline.install(&mut Terminal, &System).map(|_| ())
            }
            Command::Preview { domain } => self.cmd_preview(&domain),
            Command::Status {
                domain,
                install_dir,
                ssl,
            } => {
                self.cmd_status(&System, &domain, install_dir, ssl);
                Ok(())
            }
        }
    }

    /// Run every stage in order, ending with the reboot prompt. The
    /// first fatal error stops the run; certificate and firewall
    /// failures only degrade it.
    pub fn install(
        &self,
        prompter: &mut dyn Prompter,
        runner: &dyn Runner,
    ) -> DeployResult<Outcome> {
        let config = config::collect(prompter, &self.app)?;

        console::section("Preflight checks");
        preflight::check_privileges(runner)?;
        preflight::check_dns(runner, &config.domain);

        runtime::provision(runner)?;

        let site = Nginx::for_app(&config.domain, &self.app.upstream());
        proxy::configure(runner, &site)?;

        self.deployer.deploy(runner, &self.app, &config)?;

        let certificate = config
            .install_ssl
            .then(|| certificate::install(runner, &config));
        let firewall = config
            .configure_firewall
            .then(|| firewall::configure(runner));

        let report = Report::collect(runner, &config.domain, &config.install_dir, config.install_ssl);
        report.print();

        let https = certificate == Some(CertOutcome::Installed);
        let summary = status::summary(&config, https);
        println!("{summary}");

        status::offer_reboot(prompter, runner);

        Ok(Outcome {
            config,
            certificate,
            firewall,
            report,
            summary,
        })
    }

    /// The site `install` would write for `domain`.
    fn preview_site(&self, domain: &str) -> DeployResult<Nginx> {
        if !config::is_valid_domain(domain) {
            return Err(DeployError::Other(format!("invalid domain name: {domain}")));
        }
        Ok(Nginx::for_app(domain, &self.app.upstream()))
    }

    fn cmd_preview(&self, domain: &str) -> DeployResult<()> {
        let site = self.preview_site(domain)?;

        eprintln!("=== Dry run: no changes will be made ===");
        eprintln!();

        eprintln!("--- {} ---", site.available_path());
        println!("{}", nginx_conf::render(&site));

        eprintln!("--- Actions that would be performed ---");
        eprintln!("1. Install system packages and Docker");
        eprintln!("2. Install nginx, enable {}", site.enabled_path());
        eprintln!("3. Download {}", self.app.manifest_url);
        eprintln!("4. Write .env and bind port {} to 127.0.0.1", self.app.port);
        eprintln!("5. docker compose pull && docker compose up -d");
        eprintln!("6. Optionally issue a certificate and enable ufw");

        Ok(())
    }

    fn cmd_status(&self, runner: &dyn Runner, domain: &str, install_dir: Option<PathBuf>, ssl: bool) {
        let install_dir = install_dir.unwrap_or_else(|| {
            let home = std::env::var("HOME").map(PathBuf::from).unwrap_or_default();
            config::expand_tilde(&self.app.default_install_dir, &home)
        });
        let report = Report::collect(runner, domain, &install_dir, ssl);
        report.print();
    }
}

#[derive(Parser)]
#[command(name = "hoist")]
#[command(about = "Provision a single-host deployment behind nginx")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive installation
    Install {
        /// Override the compose manifest URL
        #[arg(long)]
        manifest_url: Option<String>,

        /// Seconds to wait after starting containers
        #[arg(long, default_value_t = SETTLE.as_secs())]
        settle_secs: u64,
    },

    /// Print the nginx site that would be written, change nothing
    Preview {
        /// Domain name served by nginx
        #[arg(long)]
        domain: String,
    },

    /// Show nginx, container, and certificate state
    Status {
        /// Domain name served by nginx
        #[arg(long)]
        domain: String,

        /// Install directory of the compose project
        #[arg(long)]
        install_dir: Option<PathBuf>,

        /// Also check for a certificate
        #[arg(long)]
        ssl: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_rejects_invalid_domain() {
        let pipeline = Pipeline::new(App::chatwoot());

        for domain in ["localhost", "", "-bad.example.com"] {
            let err = pipeline.preview_site(domain).unwrap_err();
            assert!(err.to_string().contains("invalid domain name"), "{domain:?}");
        }
        assert!(pipeline.cmd_preview("localhost").is_err());
    }

    #[test]
    fn preview_renders_site_for_app() {
        let pipeline = Pipeline::new(App::chatwoot().port(8080));

        let site = pipeline.preview_site("app.example.com").unwrap();
        let conf = nginx_conf::render(&site);

        assert_eq!(site.available_path(), "/etc/nginx/sites-available/app.example.com");
        assert!(conf.contains("server_name app.example.com;"));
        assert!(conf.contains("proxy_pass http://localhost:8080;"));
        assert!(pipeline.cmd_preview("app.example.com").is_ok());
    }
}
