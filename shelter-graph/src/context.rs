use std::sync::Arc;

use shelter_core::{ConfigError, ConfigSection, ShelterConfig};
use shelter_data::ShelterStore;
use shelter_loader::DEFAULT_YIELD_COUNT;
use shelter_security::{Caller, HasCaller, SecurityConfig, TokenService};

use crate::loaders::LoaderRegistry;

/// Batching knobs shared by every loader of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    pub yield_count: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            yield_count: DEFAULT_YIELD_COUNT,
        }
    }
}

impl ConfigSection for LoaderConfig {
    fn prefix() -> &'static str {
        "shelter.loader"
    }

    fn from_config(config: &ShelterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            yield_count: config.get_or("shelter.loader.yield_count", DEFAULT_YIELD_COUNT)?,
        })
    }
}

/// Process-wide dependencies handed to every request context.
pub struct Services {
    pub store: Arc<dyn ShelterStore>,
    pub tokens: TokenService,
    pub loader: LoaderConfig,
}

impl Services {
    pub fn new(store: Arc<dyn ShelterStore>, security: SecurityConfig, loader: LoaderConfig) -> Self {
        Self {
            store,
            tokens: TokenService::new(security),
            loader,
        }
    }
}

/// Everything one request resolves against: who is calling, the shared
/// services, and a fresh set of loaders that lives exactly as long as the
/// request.
pub struct RequestContext {
    caller: Option<Caller>,
    loaders: LoaderRegistry,
    services: Arc<Services>,
}

impl RequestContext {
    pub fn new(services: Arc<Services>, caller: Option<Caller>) -> Self {
        let loaders = LoaderRegistry::new(&services.store, services.loader.yield_count);
        Self {
            caller,
            loaders,
            services,
        }
    }

    pub fn loaders(&self) -> &LoaderRegistry {
        &self.loaders
    }

    pub fn store(&self) -> &dyn ShelterStore {
        self.services.store.as_ref()
    }

    pub fn tokens(&self) -> &TokenService {
        &self.services.tokens
    }
}

impl HasCaller for RequestContext {
    fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }
}
