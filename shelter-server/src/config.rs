use shelter_core::{ConfigError, ConfigSection, ShelterConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;

/// Listener settings (`shelter.server.*`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ConfigSection for ServerConfig {
    fn prefix() -> &'static str {
        "shelter.server"
    }

    fn from_config(config: &ShelterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            host: config.get_or("shelter.server.host", DEFAULT_HOST.to_string())?,
            port: config.get_or("shelter.server.port", DEFAULT_PORT)?,
        })
    }
}
