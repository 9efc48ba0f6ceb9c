use std::{env, fmt::Display, str::FromStr, time::Duration};
use tracing::{info, warn};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_MINIO_ENDPOINT: &str = "http://localhost:9000";

/// Which URL layout the remote API uses for record endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointStyle {
    #[default]
    Records,
    Housework,
}

impl FromStr for EndpointStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "records" => Ok(Self::Records),
            "housework" => Ok(Self::Housework),
            other => Err(format!("unknown endpoint style '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub minio_endpoint: String,
    pub endpoint_style: EndpointStyle,
    pub navigate_delay: Duration,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            minio_endpoint: DEFAULT_MINIO_ENDPOINT.to_string(),
            endpoint_style: EndpointStyle::Records,
            navigate_delay: Duration::from_millis(1500),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: load("PORT", defaults.port),
            backend_url: load("BACKEND_URL", defaults.backend_url),
            minio_endpoint: load("MINIO_ENDPOINT", defaults.minio_endpoint),
            endpoint_style: load("API_ENDPOINT_STYLE", defaults.endpoint_style),
            navigate_delay: Duration::from_millis(load(
                "NAVIGATE_DELAY_MS",
                defaults.navigate_delay.as_millis() as u64,
            )),
            max_upload_bytes: load("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }
}

fn load<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        info!("{key} not set, using default: {default:?}");
        return default;
    };

    match raw.parse() {
        Ok(value) => value,
        Err(err) => {
            warn!("invalid {key} value '{raw}': {err}, using default: {default:?}");
            default
        }
    }
}
