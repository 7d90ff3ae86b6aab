use std::net::{IpAddr, ToSocketAddrs};

use crate::cmd::Runner;
use crate::console;
use crate::error::{DeployError, DeployResult};

/// Services queried, in order, for this host's public address.
pub const PUBLIC_IP_SERVICES: &[&str] = &["https://ifconfig.me", "https://icanhazip.com"];

/// Result of comparing the domain's DNS records with this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsCheck {
    /// The public address or the domain could not be looked up.
    Skipped,
    Match,
    Mismatch {
        public_ip: IpAddr,
        resolved: Vec<IpAddr>,
    },
}

/// Refuse to run as root and require non-interactive sudo.
pub fn check_privileges(runner: &dyn Runner) -> DeployResult<()> {
    if runner.run("id", &["-u"])? == "0" {
        console::error("This installer must not be run as root");
        return Err(DeployError::RunningAsRoot);
    }

    if runner.run("sudo", &["-n", "true"]).is_err() {
        console::error("sudo access is required");
        return Err(DeployError::SudoUnavailable);
    }

    console::success("Running as a regular user with sudo access");
    Ok(())
}

/// Ask the lookup services for this host's public address.
#[must_use]
pub fn public_ip(runner: &dyn Runner) -> Option<IpAddr> {
    PUBLIC_IP_SERVICES.iter().find_map(|url| {
        runner
            .run("curl", &["-s", "--max-time", "10", url])
            .ok()
            .and_then(|out| out.trim().parse().ok())
    })
}

/// Resolve `domain` through the system resolver.
#[must_use]
pub fn resolve(domain: &str) -> Vec<IpAddr> {
    (domain, 80)
        .to_socket_addrs()
        .map(|addrs| addrs.map(|a| a.ip()).collect())
        .unwrap_or_default()
}

#[must_use]
pub fn compare_dns(public_ip: Option<IpAddr>, resolved: &[IpAddr]) -> DnsCheck {
    match public_ip {
        None => DnsCheck::Skipped,
        Some(_) if resolved.is_empty() => DnsCheck::Skipped,
        Some(ip) if resolved.contains(&ip) => DnsCheck::Match,
        Some(ip) => DnsCheck::Mismatch {
            public_ip: ip,
            resolved: resolved.to_vec(),
        },
    }
}

/// Best-effort DNS check. Never fails: a mismatch is a warning and
/// lookup failures are skipped silently.
pub fn check_dns(runner: &dyn Runner, domain: &str) -> DnsCheck {
    console::info(&format!("Checking DNS for {domain}..."));
    let check = match public_ip(runner) {
        Some(ip) => compare_dns(Some(ip), &resolve(domain)),
        None => DnsCheck::Skipped,
    };

    match &check {
        DnsCheck::Skipped => {}
        DnsCheck::Match => console::success(&format!("{domain} points to this server")),
        DnsCheck::Mismatch {
            public_ip,
            resolved,
        } => {
            let resolved: Vec<String> = resolved.iter().map(ToString::to_string).collect();
            console::warn(&format!(
                "{domain} resolves to {} but this server is {public_ip}",
                resolved.join(", ")
            ));
            console::warn("SSL issuance will fail until DNS points here");
        }
    }

    check
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn unknown_public_ip_skips() {
        assert_eq!(compare_dns(None, &[ip("1.2.3.4")]), DnsCheck::Skipped);
    }

    #[test]
    fn unresolved_domain_skips() {
        assert_eq!(compare_dns(Some(ip("1.2.3.4")), &[]), DnsCheck::Skipped);
    }

    #[test]
    fn any_matching_record_matches() {
        let resolved = [ip("2001:db8::1"), ip("1.2.3.4")];
        assert_eq!(compare_dns(Some(ip("1.2.3.4")), &resolved), DnsCheck::Match);
    }

    #[test]
    fn different_record_mismatches() {
        let check = compare_dns(Some(ip("1.2.3.4")), &[ip("5.6.7.8")]);
        assert_eq!(
            check,
            DnsCheck::Mismatch {
                public_ip: ip("1.2.3.4"),
                resolved: vec![ip("5.6.7.8")],
            }
        );
    }
}
