mod common;

use std::path::Path;

use common::{EXITED, FakeRunner};
use hoist::status::Report;

#[test]
fn healthy_host_with_certificate() {
    let runner = FakeRunner::healthy();
    let dir = Path::new("/srv/chatwoot");

    let report = Report::collect(&runner, "app.example.com", dir, true);

    assert!(report.nginx);
    assert!(report.containers);
    assert_eq!(report.certificate, Some(true));
    assert!(report.https());
    assert!(runner.ran("systemctl is-active --quiet nginx"));
    assert!(runner.ran("test -d /etc/letsencrypt/live/app.example.com"));
    let ps = runner.call("docker compose ps").unwrap();
    assert_eq!(ps.dir.as_deref(), Some(dir));
}

#[test]
fn missing_certificate_and_stopped_services() {
    let runner = FakeRunner::healthy()
        .fail("letsencrypt")
        .fail("is-active")
        .output("docker compose ps", EXITED);

    let report = Report::collect(&runner, "app.example.com", Path::new("/srv/chatwoot"), true);

    assert!(!report.nginx);
    assert!(!report.containers);
    assert_eq!(report.certificate, Some(false));
    assert!(!report.https());
}

#[test]
fn certificate_not_checked_without_ssl() {
    let runner = FakeRunner::healthy();

    let report = Report::collect(&runner, "app.example.com", Path::new("/srv/chatwoot"), false);

    assert_eq!(report.certificate, None);
    assert!(!runner.ran("letsencrypt"));
}
