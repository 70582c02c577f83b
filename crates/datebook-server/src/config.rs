use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;

/// Placeholder secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "your-super-secret-jwt-key-change-in-production",
];

/// Server configuration parsed from environment variables. A `.env`
/// file is honored when present (loaded in main before parsing).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub public_dir: PathBuf,
    pub jwt_secret: String,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("DATEBOOK_JWT_SECRET").unwrap_or_default();
        check_secret(&jwt_secret)?;

        let host = std::env::var("DATEBOOK_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()?;
        let db_path: PathBuf = std::env::var("DATEBOOK_DB_PATH")
            .unwrap_or_else(|_| "datebook.db".into())
            .into();
        let public_dir: PathBuf = std::env::var("DATEBOOK_PUBLIC_DIR")
            .unwrap_or_else(|_| "public".into())
            .into();
        let rate_limit_max: u32 = std::env::var("DATEBOOK_RATE_LIMIT_MAX")
            .unwrap_or_else(|_| "100".into())
            .parse()?;
        let window_secs: u64 = std::env::var("DATEBOOK_RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()?;

        Ok(Self {
            host,
            port,
            db_path,
            public_dir,
            jwt_secret,
            rate_limit_max,
            rate_limit_window: Duration::from_secs(window_secs),
        })
    }
}

/// Signed session tokens are only as strong as this secret, so startup
/// fails outright rather than fall back to a guessable default.
pub fn check_secret(secret: &str) -> anyhow::Result<()> {
    if secret.is_empty() {
        bail!("DATEBOOK_JWT_SECRET is unset; refusing to start without a signing secret");
    }
    if PLACEHOLDER_SECRETS.contains(&secret) {
        bail!("DATEBOOK_JWT_SECRET is still a placeholder value; set a real secret");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::check_secret;

    #[test]
    fn rejects_empty_secret() {
        assert!(check_secret("").is_err());
    }

    #[test]
    fn rejects_placeholder_secrets() {
        assert!(check_secret("dev-secret-change-me").is_err());
        assert!(check_secret("your-super-secret-jwt-key-change-in-production").is_err());
    }

    #[test]
    fn accepts_a_real_secret() {
        assert!(check_secret("fdd02a8d3a8f4c0f9f4b2e1d").is_ok());
    }
}
