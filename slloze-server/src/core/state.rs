use std::sync::Arc;

use shared::AppError;

use crate::auth::{JwtService, UserDirectory};
use crate::core::Config;
use crate::gateway::{HttpGateway, ResourceGateway};

/// Shared server state
///
/// Holds singleton references to the services every handler needs. All
/// fields are behind `Arc`, so cloning the state per request is cheap.
/// There is deliberately no local resource store in here: restaurants,
/// orders and payment methods live behind the gateway.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// JWT token service
    pub jwt_service: Arc<JwtService>,
    /// User directory (identities and password hashes)
    pub directory: Arc<UserDirectory>,
    /// Resource gateway, the source of truth for all resources
    pub gateway: Arc<dyn ResourceGateway>,
}

impl ServerState {
    /// Initialize state from configuration, wiring the HTTP gateway
    pub fn initialize(config: &Config) -> Result<Self, AppError> {
        let gateway = HttpGateway::new(&config.gateway_url, config.gateway_token.clone())?;
        Self::with_gateway(config.clone(), Arc::new(gateway))
    }

    /// Build state over an explicit gateway implementation
    ///
    /// Tests use this with the in-memory gateway.
    pub fn with_gateway(
        config: Config,
        gateway: Arc<dyn ResourceGateway>,
    ) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let directory = Arc::new(UserDirectory::seeded()?);

        Ok(Self {
            config,
            jwt_service,
            directory,
            gateway,
        })
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn gateway(&self) -> &dyn ResourceGateway {
        self.gateway.as_ref()
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
