use std::{
    env,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not a valid {expected}: {value}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server and storage settings read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub public_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_var("HOST", "IP address", DEFAULT_HOST)?,
            port: parse_var("PORT", "port number", &DEFAULT_PORT.to_string())?,
            upload_dir: path_var("UPLOAD_DIR", DEFAULT_UPLOAD_DIR),
            public_dir: path_var("PUBLIC_DIR", DEFAULT_PUBLIC_DIR),
            max_upload_bytes: parse_var(
                "MAX_UPLOAD_BYTES",
                "byte count",
                &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
            )?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn path_var(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn parse_var<T: std::str::FromStr>(
    key: &'static str,
    expected: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        expected,
        value,
    })
}
