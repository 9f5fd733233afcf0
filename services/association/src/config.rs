/// Association service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AssocConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session cookies.
    pub session_secret: String,
    /// TCP port to listen on (default 8080). Env var: `ASSOC_PORT`.
    pub port: u16,
    /// Directory served under `/static` and holding the SPA `index.html`
    /// (default "static"). Env var: `STATIC_DIR`.
    pub static_dir: String,
    /// Password for the bootstrap admin account (default "admin123").
    /// Env var: `ADMIN_PASSWORD`.
    pub admin_password: String,
    /// E-mail for the bootstrap admin account. Env var: `ADMIN_EMAIL`.
    pub admin_email: String,
}

impl AssocConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            session_secret: std::env::var("SESSION_SECRET").expect("SESSION_SECRET"),
            port: std::env::var("ASSOC_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_owned()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_owned()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".to_owned()),
        }
    }
}
