use std::sync::Arc;

use axum::extract::FromRef;
use shelter_core::{ConfigError, ShelterConfig};
use shelter_data::ShelterStore;
use shelter_graph::{LoaderConfig, Services};
use shelter_security::{JwtValidator, SecurityConfig};

/// Shared state behind every route. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    services: Arc<Services>,
    validator: Arc<JwtValidator>,
}

impl AppState {
    pub fn new(store: Arc<dyn ShelterStore>, security: SecurityConfig, loader: LoaderConfig) -> Self {
        if security.secret.is_none() {
            tracing::warn!("no JWT secret configured: login and bearer tokens are disabled");
        }
        let validator = Arc::new(JwtValidator::new(security.clone()));
        let services = Arc::new(Services::new(store, security, loader));
        Self {
            services,
            validator,
        }
    }

    /// Build from the `shelter.security` and `shelter.loader` sections.
    pub fn from_config(
        config: &ShelterConfig,
        store: Arc<dyn ShelterStore>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(store, config.section()?, config.section()?))
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    pub fn validator(&self) -> &Arc<JwtValidator> {
        &self.validator
    }
}

impl FromRef<AppState> for Arc<Services> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.services)
    }
}

impl FromRef<AppState> for Arc<JwtValidator> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.validator)
    }
}
