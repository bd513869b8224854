/// Configuration management for the API server
///
/// Loads configuration from environment variables into a typed struct.
///
/// # Environment Variables
///
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 4000)
/// - `DATABASE_URL`: Postgres connection string; when absent the
///   server runs on the in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `JWT_SECRET`: token signing secret, at least 32 bytes (required)
/// - `SMTP_HOST` / `SMTP_USERNAME` / `SMTP_PASSWORD` / `EMAIL_FROM`:
///   mail transport; the reminder scheduler is disabled unless all
///   four are set
/// - `REMINDER_HOUR`: local hour for the daily digest (default: 8)
/// - `CORS_ORIGINS`: comma-separated allowed origins, or `*`
///   (default: `*`)

use std::env;

use taskflow_reminder::mailer::SmtpConfig;
use taskflow_shared::db::pool::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration; `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// SMTP configuration; `None` disables the reminder scheduler
    pub smtp: Option<SmtpConfig>,

    /// Local hour for the daily digest run
    pub reminder_hour: u32,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `["*"]` means permissive
    pub cors_origins: Vec<String>,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or too short, or if
    /// a numeric variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database = match env::var("DATABASE_URL") {
            Ok(url) => {
                let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse::<u32>()?;
                Some(DatabaseConfig {
                    url,
                    max_connections,
                    ..Default::default()
                })
            }
            Err(_) => None,
        };

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let smtp = match (
            env::var("SMTP_HOST"),
            env::var("SMTP_USERNAME"),
            env::var("SMTP_PASSWORD"),
            env::var("EMAIL_FROM"),
        ) {
            (Ok(host), Ok(username), Ok(password), Ok(from)) => Some(SmtpConfig {
                host,
                username,
                password,
                from,
            }),
            _ => None,
        };

        let reminder_hour = env::var("REMINDER_HOUR")
            .unwrap_or_else(|_| "8".to_string())
            .parse::<u32>()?;
        if reminder_hour > 23 {
            anyhow::bail!("REMINDER_HOUR must be between 0 and 23");
        }

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database,
            jwt: JwtConfig { secret: jwt_secret },
            smtp,
            reminder_hour,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 4000,
                cors_origins: vec!["*".to_string()],
            },
            database: None,
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            smtp: None,
            reminder_hour: 8,
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:4000");
    }
}
