use std::fmt::Write as _;

use crate::nginx::Nginx;

/// MIME types compressed when gzip is enabled.
pub const GZIP_TYPES: &[&str] = &[
    "text/plain",
    "text/css",
    "text/xml",
    "text/javascript",
    "application/json",
    "application/javascript",
    "application/xml+rss",
    "application/atom+xml",
    "image/svg+xml",
];

/// Response headers added when security headers are enabled.
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    ("X-XSS-Protection", "1; mode=block"),
];

/// Request headers forwarded to the upstream.
pub const FORWARDED_HEADERS: &[(&str, &str)] = &[
    ("Host", "$host"),
    ("X-Real-IP", "$remote_addr"),
    ("X-Forwarded-For", "$proxy_add_x_forwarded_for"),
    ("X-Forwarded-Proto", "$scheme"),
];

/// Headers that let websocket upgrades through the proxy.
pub const UPGRADE_HEADERS: &[(&str, &str)] = &[
    ("Upgrade", "$http_upgrade"),
    ("Connection", "\"upgrade\""),
];

/// Render a complete nginx server block for the site.
#[must_use]
pub fn render(site: &Nginx) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "server {{");
    let _ = writeln!(out, "    listen {};", site.listen);
    let _ = writeln!(out, "    listen [::]:{};", site.listen);
    let _ = writeln!(out, "    server_name {};", site.server_name);

    if let Some(upstream) = &site.upstream {
        out.push('\n');
        let _ = writeln!(out, "    location / {{");
        let _ = writeln!(out, "        proxy_pass {upstream};");
        if site.websocket {
            let _ = writeln!(out, "        proxy_http_version 1.1;");
            for (name, value) in UPGRADE_HEADERS {
                let _ = writeln!(out, "        proxy_set_header {name} {value};");
            }
        }
        for (name, value) in FORWARDED_HEADERS {
            let _ = writeln!(out, "        proxy_set_header {name} {value};");
        }
        if let Some(secs) = site.read_timeout {
            let _ = writeln!(out, "        proxy_read_timeout {secs};");
        }
        let _ = writeln!(out, "    }}");
    }

    if site.gzip {
        out.push('\n');
        let _ = writeln!(out, "    gzip on;");
        let _ = writeln!(out, "    gzip_vary on;");
        let _ = writeln!(out, "    gzip_proxied any;");
        let _ = writeln!(out, "    gzip_min_length 1024;");
        let _ = writeln!(out, "    gzip_types {};", GZIP_TYPES.join(" "));
    }

    if site.security_headers {
        out.push('\n');
        for (name, value) in SECURITY_HEADERS {
            let _ = writeln!(out, "    add_header {name} \"{value}\" always;");
        }
    }

    let _ = writeln!(out, "}}");
    out
}
