/// nginx site definition for the application.
///
/// # Example
///
/// ```
/// use hoist::Nginx;
///
/// let site = Nginx::new("app.example.com")
///     .upstream("http://localhost:3000")
///     .websocket()
///     .gzip()
///     .security_headers();
///
/// assert!(site.gzip);
/// assert!(site.security_headers);
/// assert_eq!(site.listen, 80);
/// ```
#[derive(Debug, Clone)]
pub struct Nginx {
    pub server_name: String,
    pub listen: u16,
    pub upstream: Option<String>,
    pub websocket: bool,
    pub read_timeout: Option<u32>,
    pub gzip: bool,
    pub security_headers: bool,
}

/// Directory holding every known site.
pub const SITES_AVAILABLE: &str = "/etc/nginx/sites-available";

/// Directory holding links to the enabled sites.
pub const SITES_ENABLED: &str = "/etc/nginx/sites-enabled";

impl Nginx {
    #[must_use]
    pub fn new(server_name: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
            listen: 80,
            upstream: None,
            websocket: false,
            read_timeout: None,
            gzip: false,
            security_headers: false,
        }
    }

    /// Site used for the application: websocket-capable proxy to
    /// `upstream` with a one-day read timeout, gzip, and security
    /// headers.
    #[must_use]
    pub fn for_app(server_name: &str, upstream: &str) -> Self {
        Self::new(server_name)
            .upstream(upstream)
            .websocket()
            .read_timeout(86_400)
            .gzip()
            .security_headers()
    }

    #[must_use]
    pub const fn listen(mut self, port: u16) -> Self {
        self.listen = port;
        self
    }

    #[must_use]
    pub fn upstream(mut self, url: &str) -> Self {
        self.upstream = Some(url.to_string());
        self
    }

    #[must_use]
    pub const fn websocket(mut self) -> Self {
        self.websocket = true;
        self
    }

    #[must_use]
    pub const fn read_timeout(mut self, secs: u32) -> Self {
        self.read_timeout = Some(secs);
        self
    }

    #[must_use]
    pub const fn gzip(mut self) -> Self {
        self.gzip = true;
        self
    }

    #[must_use]
    pub const fn security_headers(mut self) -> Self {
        self.security_headers = true;
        self
    }

    #[must_use]
    pub fn available_path(&self) -> String {
        format!("{SITES_AVAILABLE}/{}", self.server_name)
    }

    #[must_use]
    pub fn enabled_path(&self) -> String {
        format!("{SITES_ENABLED}/{}", self.server_name)
    }
}
