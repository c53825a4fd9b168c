use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

/// Everything request handlers and background tasks share. Constructed once
/// at startup and passed around explicitly; there is no ambient global.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let (bootstrap_password, is_default) = config.auth.bootstrap_password();
        let created = store
            .initialize_admin_user(&bootstrap_password, &config.security)
            .await?;

        if created {
            if is_default {
                warn!(
                    "Admin user initialized with the default password; set \
                     FILMARR_ADMIN_PASSWORD or [auth] admin_password before exposing \
                     this instance"
                );
            } else {
                info!("Admin user initialized");
            }
        }

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            &config.auth,
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            auth_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
