//! Interactive collection of the deployment configuration.
//!
//! Everything is gathered and validated here, before any system
//! mutation. The resulting [`Config`] is immutable and threaded by
//! reference through every later stage.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::app::App;
use crate::console;
use crate::error::{DeployError, DeployResult};
use crate::prompt::{Prompter, parse_yes};
use crate::secrets;

/// Minimum length of a user-supplied database password.
pub const MIN_PASSWORD_LEN: usize = 8;

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*(\.[A-Za-z0-9][A-Za-z0-9-]*)*\.[A-Za-z]{2,}$")
        .expect("domain pattern is valid")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

/// Database password and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbPassword {
    Generated(String),
    Supplied(String),
}

impl DbPassword {
    #[must_use]
    pub fn expose(&self) -> &str {
        match self {
            Self::Generated(p) | Self::Supplied(p) => p,
        }
    }

    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// Validated deployment configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub domain: String,
    pub email: String,
    pub db_user: String,
    pub db_password: DbPassword,
    pub db_name: String,
    pub api_key: Option<String>,
    pub install_dir: PathBuf,
    pub install_ssl: bool,
    pub configure_firewall: bool,
}

impl Config {
    /// Path of the secrets file inside the install directory.
    #[must_use]
    pub fn env_path(&self) -> PathBuf {
        self.install_dir.join(".env")
    }

    /// Human-readable listing shown before the final confirmation.
    /// The password is never included.
    #[must_use]
    pub fn summary(&self) -> String {
        let password = if self.db_password.is_generated() {
            "<generated>"
        } else {
            "<hidden>"
        };
        let api_key = if self.api_key.is_some() {
            "<set>"
        } else {
            "<not set>"
        };

        let install_dir = self.install_dir.to_string_lossy();
        let mut out = String::new();
        let rows = [
            ("Domain", self.domain.as_str()),
            ("Email", self.email.as_str()),
            ("Database user", self.db_user.as_str()),
            ("Database password", password),
            ("Database name", self.db_name.as_str()),
            ("OpenAI API key", api_key),
            ("Install directory", install_dir.as_ref()),
            ("Install SSL", yes_no(self.install_ssl)),
            ("Configure firewall", yes_no(self.configure_firewall)),
        ];
        for (label, value) in rows {
            let _ = writeln!(out, "  {label:<20} {value}");
        }
        out
    }
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[must_use]
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_RE.is_match(domain)
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Outcome of a single password answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordAnswer {
    Generate,
    TooShort,
    Accept(String),
}

#[must_use]
pub fn check_password(input: &str) -> PasswordAnswer {
    if input.is_empty() {
        PasswordAnswer::Generate
    } else if input.chars().count() < MIN_PASSWORD_LEN {
        PasswordAnswer::TooShort
    } else {
        PasswordAnswer::Accept(input.to_string())
    }
}

/// Expand a leading `~` against `home`.
#[must_use]
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

fn home_dir() -> DeployResult<PathBuf> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| DeployError::EnvMissing("HOME".into()))
}

fn ask_or(prompter: &mut dyn Prompter, label: &str, default: &str) -> DeployResult<String> {
    let answer = prompter.ask(&format!("{label} [{default}]"))?;
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer
    })
}

fn ask_until(
    prompter: &mut dyn Prompter,
    label: &str,
    valid: fn(&str) -> bool,
    complaint: &str,
) -> DeployResult<String> {
    loop {
        let answer = prompter.ask(label)?;
        if valid(&answer) {
            return Ok(answer);
        }
        console::error(complaint);
    }
}

fn ask_password(prompter: &mut dyn Prompter) -> DeployResult<DbPassword> {
    loop {
        let answer = prompter.ask_secret("Database password (leave empty to generate)")?;
        match check_password(&answer) {
            PasswordAnswer::Generate => {
                console::info("Generated a random database password");
                return Ok(DbPassword::Generated(secrets::generate_password()));
            }
            PasswordAnswer::TooShort => console::error(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )),
            PasswordAnswer::Accept(p) => return Ok(DbPassword::Supplied(p)),
        }
    }
}

/// Prompt for every value, show the summary, and require a final
/// `y`. Any other answer returns [`DeployError::Aborted`].
pub fn collect(prompter: &mut dyn Prompter, app: &App) -> DeployResult<Config> {
    console::section("Configuration");

    let domain = ask_until(
        prompter,
        "Domain name (e.g. chat.example.com)",
        is_valid_domain,
        "Invalid domain name",
    )?;
    let email = ask_until(
        prompter,
        "Email for SSL certificate",
        is_valid_email,
        "Invalid email address",
    )?;
    let db_password = ask_password(prompter)?;
    let db_user = ask_or(prompter, "Database user", &app.default_db_user)?;
    let db_name = ask_or(prompter, "Database name", &app.default_db_name)?;
    let install_dir = ask_or(prompter, "Install directory", &app.default_install_dir)?;
    let install_dir = if install_dir.starts_with('~') {
        expand_tilde(&install_dir, &home_dir()?)
    } else {
        PathBuf::from(install_dir)
    };

    let api_key = prompter.ask("OpenAI API key (optional, leave empty to skip)")?;
    let api_key = (!api_key.is_empty()).then_some(api_key);

    let install_ssl = parse_yes(&prompter.ask("Install SSL certificate with Let's Encrypt? (y/N)")?);
    let configure_firewall = parse_yes(&prompter.ask("Configure ufw firewall? (y/N)")?);

    let config = Config {
        domain,
        email,
        db_user,
        db_password,
        db_name,
        api_key,
        install_dir,
        install_ssl,
        configure_firewall,
    };

    eprintln!();
    eprintln!("Installation summary:");
    eprint!("{}", config.summary());
    eprintln!();

    if parse_yes(&prompter.ask("Proceed with installation? (y/N)")?) {
        Ok(config)
    } else {
        console::error("Installation cancelled");
        Err(DeployError::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domains() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("app.example.com"));
        assert!(is_valid_domain("a-b.c-d.example.io"));
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("localhost"));
        assert!(!is_valid_domain("example.c"));
        assert!(!is_valid_domain("-bad.com"));
        assert!(!is_valid_domain("bad..com"));
        assert!(!is_valid_domain("example.123"));
        assert!(!is_valid_domain("has space.com"));
    }

    #[test]
    fn emails() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("admin.example.com"));
        assert!(!is_valid_email("admin@example"));
        assert!(!is_valid_email("admin@example.c"));
        assert!(!is_valid_email("ad min@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn password_rules() {
        assert_eq!(check_password(""), PasswordAnswer::Generate);
        assert_eq!(check_password("short"), PasswordAnswer::TooShort);
        assert_eq!(check_password("1234567"), PasswordAnswer::TooShort);
        assert_eq!(
            check_password("12345678"),
            PasswordAnswer::Accept("12345678".into())
        );
    }

    #[test]
    fn tilde_expansion() {
        let home = Path::new("/home/deploy");

        assert_eq!(expand_tilde("~", home), PathBuf::from("/home/deploy"));
        assert_eq!(
            expand_tilde("~/chatwoot", home),
            PathBuf::from("/home/deploy/chatwoot")
        );
        assert_eq!(expand_tilde("/opt/app", home), PathBuf::from("/opt/app"));
        assert_eq!(expand_tilde("~other/x", home), PathBuf::from("~other/x"));
    }

    #[test]
    fn summary_hides_password() {
        let config = Config {
            domain: "app.example.com".into(),
            email: "admin@example.com".into(),
            db_user: "chatwoot".into(),
            db_password: DbPassword::Supplied("supersecret".into()),
            db_name: "chatwoot_production".into(),
            api_key: None,
            install_dir: PathBuf::from("/home/deploy/chatwoot"),
            install_ssl: true,
            configure_firewall: false,
        };

        let summary = config.summary();

        assert!(summary.contains("app.example.com"));
        assert!(summary.contains("<hidden>"));
        assert!(summary.contains("<not set>"));
        assert!(!summary.contains("supersecret"));
    }
}
