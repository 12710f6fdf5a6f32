use crate::backend::HttpSupportClient;
use crate::config::Config;
use crate::workflow::Console;

/// Shared handler state. One console session per process.
#[derive(Clone)]
pub struct AppState {
    pub console: Console<HttpSupportClient>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let backend = HttpSupportClient::from_config(config)?;
        Ok(Self {
            console: Console::new(backend),
        })
    }
}
