use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen: String,
    pub backend_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    pub cors_origins: Vec<String>,
    pub dev_mode: bool,
}

const DEFAULT_TIMEOUT_SECS: u64 = 15;

fn parse_cors_origins(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_timeout(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

impl Config {
    pub fn load() -> Self {
        Self {
            listen: env::var("CONSOLE_LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            backend_url: env::var("CONSOLE_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".into()),
            api_token: env::var("CONSOLE_API_TOKEN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            request_timeout: parse_timeout(env::var("CONSOLE_REQUEST_TIMEOUT_SECS").ok().as_deref()),
            cors_origins: env::var("CONSOLE_CORS_ORIGINS")
                .ok()
                .map_or_else(Vec::new, |v| parse_cors_origins(&v)),
            dev_mode: env::var("CONSOLE_DEV").ok().is_some_and(|v| v == "true"),
        }
    }
}
