//! Helpers around the downloaded compose manifest and the output
//! of `docker compose`.

use docker_compose_types::{Compose, Ports};
use serde::Deserialize;

use crate::error::DeployResult;

/// Host addresses that publish on every interface.
const ALL_INTERFACES: &[&str] = &["0.0.0.0:", "[::]:"];

/// Rewrite `port:port` mappings so they bind the loopback
/// interface only. Returns the new text and whether anything
/// changed. Unbound mappings and mappings on `0.0.0.0` or `[::]`
/// are rewritten; any other address is left alone.
#[must_use]
pub fn bind_loopback(manifest: &str, port: u16) -> (String, bool) {
    let mapping = format!("{port}:{port}");
    let mut changed = false;
    let mut out = String::with_capacity(manifest.len() + 16);

    for line in manifest.split_inclusive('\n') {
        match rebind(line, &mapping) {
            Some(rewritten) => {
                out.push_str(&rewritten);
                changed = true;
            }
            None => out.push_str(line),
        }
    }

    (out, changed)
}

fn rebind(line: &str, mapping: &str) -> Option<String> {
    let at = line.find(mapping)?;
    if line[at + mapping.len()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
    {
        return None;
    }
    let (head, tail) = line.split_at(at);

    let host = ALL_INTERFACES
        .iter()
        .find_map(|any| head.strip_suffix(any))
        .filter(|rest| !rest.ends_with(|c: char| c == '.' || c.is_ascii_digit()));
    if let Some(rest) = host {
        return Some(format!("{rest}127.0.0.1:{tail}"));
    }

    let bound = head.ends_with(|c: char| c == ':' || c == '.' || c.is_ascii_digit());
    (!bound).then(|| format!("{head}127.0.0.1:{tail}"))
}

/// A published port as declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub service: String,
    pub host_ip: Option<String>,
    pub container_port: u16,
}

impl Published {
    /// True when the port is reachable on every host interface.
    #[must_use]
    pub fn on_all_interfaces(&self) -> bool {
        self.host_ip
            .as_deref()
            .is_none_or(|ip| ip == "0.0.0.0" || ip == "::")
    }
}

/// Parse the manifest and list every published port.
pub fn published_ports(manifest: &str) -> DeployResult<Vec<Published>> {
    let mut value: serde_yaml::Value = serde_yaml::from_str(manifest)?;
    value.apply_merge()?;
    let compose: Compose = serde_yaml::from_value(value)?;

    let mut published = Vec::new();
    for (name, service) in &compose.services.0 {
        let Some(service) = service else { continue };
        match &service.ports {
            Ports::Short(list) => {
                published.extend(list.iter().filter_map(|p| parse_short(name, p)));
            }
            Ports::Long(list) => {
                published.extend(list.iter().map(|p| Published {
                    service: name.clone(),
                    host_ip: p.host_ip.clone(),
                    container_port: p.target,
                }));
            }
        }
    }
    Ok(published)
}

/// `[ip:]host:container[/proto]`. A bare container port is not
/// considered published to a fixed host port.
fn parse_short(service: &str, spec: &str) -> Option<Published> {
    let spec = spec.split('/').next().unwrap_or(spec);
    let parts: Vec<&str> = spec.split(':').collect();
    let (host_ip, container) = match parts.as_slice() {
        [_, container] => (None, container),
        [ip, _, container] => (Some((*ip).to_string()), container),
        _ => return None,
    };
    Some(Published {
        service: service.to_string(),
        host_ip,
        container_port: container.parse().ok()?,
    })
}

/// One row of `docker compose ps --format json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PsEntry {
    #[serde(rename = "Service", default)]
    pub service: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

impl PsEntry {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == "running" || self.status.starts_with("Up")
    }
}

/// Parse `docker compose ps --format json`. Older compose releases
/// print a JSON array, newer ones one object per line.
pub fn parse_ps(output: &str) -> DeployResult<Vec<PsEntry>> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    trimmed
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_port_forms() {
        assert_eq!(
            parse_short("rails", "3000:3000"),
            Some(Published {
                service: "rails".into(),
                host_ip: None,
                container_port: 3000,
            })
        );
        assert_eq!(
            parse_short("rails", "127.0.0.1:3000:3000/tcp")
                .and_then(|p| p.host_ip),
            Some("127.0.0.1".into())
        );
        assert_eq!(parse_short("rails", "3000"), None);
    }

    #[test]
    fn loopback_is_not_all_interfaces() {
        let p = Published {
            service: "rails".into(),
            host_ip: Some("127.0.0.1".into()),
            container_port: 3000,
        };
        assert!(!p.on_all_interfaces());

        let p = Published {
            host_ip: Some("0.0.0.0".into()),
            ..p
        };
        assert!(p.on_all_interfaces());
    }

    #[test]
    fn ps_running_state() {
        let up = PsEntry {
            status: "Up 12 seconds".into(),
            ..PsEntry::default()
        };
        let exited = PsEntry {
            state: "exited".into(),
            status: "Exited (1) 3 seconds ago".into(),
            ..PsEntry::default()
        };

        assert!(up.is_running());
        assert!(!exited.is_running());
    }
}
