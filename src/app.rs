/// Describes the application being deployed: where its compose
/// manifest lives, which port it serves, and the defaults offered
/// at the prompts.
///
/// # Example
///
/// ```
/// use hoist::App;
///
/// let app = App::new("notes")
///     .manifest_url("https://example.com/compose.yaml")
///     .port(8080)
///     .default_db("notes", "notes_production")
///     .default_install_dir("~/notes");
///
/// assert_eq!(app.name, "notes");
/// assert_eq!(app.upstream(), "http://localhost:8080");
/// ```
#[derive(Debug, Clone)]
pub struct App {
    pub name: String,
    pub manifest_url: String,
    pub manifest_file: String,
    pub port: u16,
    pub default_db_user: String,
    pub default_db_name: String,
    pub default_install_dir: String,
}

/// Production compose file published by the Chatwoot project.
pub const CHATWOOT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/chatwoot/chatwoot/develop/docker-compose.production.yaml";

impl App {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            manifest_url: String::new(),
            manifest_file: "docker-compose.yaml".to_string(),
            port: 3000,
            default_db_user: "postgres".to_string(),
            default_db_name: name.to_string(),
            default_install_dir: format!("~/{name}"),
        }
    }

    /// The Chatwoot profile used by the `hoist` binary.
    #[must_use]
    pub fn chatwoot() -> Self {
        Self::new("chatwoot")
            .manifest_url(CHATWOOT_MANIFEST_URL)
            .default_db("chatwoot", "chatwoot_production")
    }

    #[must_use]
    pub fn manifest_url(mut self, url: &str) -> Self {
        self.manifest_url = url.to_string();
        self
    }

    #[must_use]
    pub fn manifest_file(mut self, file: &str) -> Self {
        self.manifest_file = file.to_string();
        self
    }

    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn default_db(mut self, user: &str, name: &str) -> Self {
        self.default_db_user = user.to_string();
        self.default_db_name = name.to_string();
        self
    }

    #[must_use]
    pub fn default_install_dir(mut self, dir: &str) -> Self {
        self.default_install_dir = dir.to_string();
        self
    }

    /// Local URL nginx proxies to.
    #[must_use]
    pub fn upstream(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let app = App::new("myapp");

        assert_eq!(app.name, "myapp");
        assert!(app.manifest_url.is_empty());
        assert_eq!(app.manifest_file, "docker-compose.yaml");
        assert_eq!(app.port, 3000);
        assert_eq!(app.default_db_user, "postgres");
        assert_eq!(app.default_db_name, "myapp");
        assert_eq!(app.default_install_dir, "~/myapp");
    }

    #[test]
    fn chatwoot_profile() {
        let app = App::chatwoot();

        assert_eq!(app.manifest_url, CHATWOOT_MANIFEST_URL);
        assert_eq!(app.default_db_user, "chatwoot");
        assert_eq!(app.default_db_name, "chatwoot_production");
        assert_eq!(app.default_install_dir, "~/chatwoot");
        assert_eq!(app.upstream(), "http://localhost:3000");
    }

    #[test]
    fn manifest_url_overrides() {
        let app = App::new("x")
            .manifest_url("https://a.test/one.yaml")
            .manifest_url("https://a.test/two.yaml");

        assert_eq!(app.manifest_url, "https://a.test/two.yaml");
    }
}
