use std::net::SocketAddr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

impl Env {
    pub fn from_env() -> Self {
        match var("ENVIRONMENT") {
            Ok(Some(env)) => Env::parse(&env),
            _ => Env::Dev,
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "dev" => Env::Dev,
            "staging" => Env::Staging,
            "production" => Env::Production,
            _ => Env::Dev,
        }
    }
}

pub struct ServerConfig {
    pub env: Env,
    pub listen_addr: SocketAddr,

    /// Postgres connection string. Without it the server keeps everything in
    /// memory, which is only useful for local development.
    pub database_url: Option<String>,

    /// Whether `POST /campgrounds/{id}/comments` waits for the comment and the
    /// campground reference to be written before redirecting.
    pub await_comment_writes: bool,

    pub secure_cookies: bool,

    /// Session token registered for a seeded user when running on the
    /// in-memory store.
    pub dev_auth_token: Option<String>,
}

const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 3000);

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(e) => match e {
            std::env::VarError::NotPresent => {
                tracing::debug!("Missing environment variable `{key}`");
                Ok(None)
            }
            std::env::VarError::NotUnicode(_) => Err(format!(
                "Could not get the environment variable `{key}` due to unicode error"
            )),
        },
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn bool_var(key: &str, default: bool) -> bool {
    match var(key) {
        Ok(Some(val)) => parse_bool(&val).unwrap_or_else(|| {
            tracing::warn!("Environment variable `{key}` is not a boolean: `{val}`, using {default}");
            default
        }),
        Ok(None) => default,
        Err(e) => {
            tracing::warn!("{e}, using {default}");
            default
        }
    }
}

impl ServerConfig {
    pub fn new_from_env(env: Env) -> Self {
        let listen_addr = match var("LISTEN_ADDR") {
            Ok(Some(addr)) => addr.parse().unwrap_or_else(|e| {
                tracing::error!("Invalid `LISTEN_ADDR` `{addr}`: {e}, falling back to {DEFAULT_LISTEN_ADDR}");
                DEFAULT_LISTEN_ADDR
            }),
            _ => DEFAULT_LISTEN_ADDR,
        };

        let database_url = var("DATABASE_URL").unwrap_or_else(|e| {
            tracing::error!("{e}");
            None
        });

        ServerConfig {
            env,
            listen_addr,
            database_url,
            await_comment_writes: bool_var("AWAIT_COMMENT_WRITES", false),
            secure_cookies: bool_var("SECURE_COOKIES", env == Env::Production),
            dev_auth_token: var("DEV_AUTH_TOKEN").ok().flatten(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            env: Env::Dev,
            listen_addr: DEFAULT_LISTEN_ADDR,
            database_url: None,
            await_comment_writes: false,
            secure_cookies: false,
            dev_auth_token: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_environment_falls_back_to_dev() {
        assert_eq!(Env::parse("production"), Env::Production);
        assert_eq!(Env::parse("staging"), Env::Staging);
        assert_eq!(Env::parse("prod"), Env::Dev, "Only exact names are recognised");
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 1 "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn default_config_does_not_wait_for_writes() {
        let config = ServerConfig::default();
        assert!(!config.await_comment_writes);
        assert!(config.database_url.is_none());
        assert_eq!(config.listen_addr.port(), 3000);
    }
}
