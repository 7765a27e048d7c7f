use crate::application::resolver::Resolver;
use crate::domain::error::RecapError;
use crate::infrastructure::config::{get_database_path, Config};
use crate::infrastructure::network::client::RiotClient;
use crate::infrastructure::network::http::{create_client, ReqwestTransport};
use crate::infrastructure::storage::cache::CacheGateway;
use crate::infrastructure::storage::db::SqliteStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_path: Option<PathBuf>,
    pub resolver: Resolver,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, RecapError> {
        let db_path = get_database_path(&config);
        let gateway = match &db_path {
            Some(path) => open_gateway(path).await,
            None => CacheGateway::disabled(),
        };

        let http_client = create_client(&config.riot.user_agent)?;
        let client = RiotClient::new(
            Arc::new(ReqwestTransport::new(http_client)),
            config.api_key(),
            config.retry_policy(),
        );
        let resolver = Resolver::new(client, gateway, config.dedup_window());

        Ok(Self {
            config: Arc::new(config),
            db_path,
            resolver,
        })
    }

    pub fn gateway(&self) -> &CacheGateway {
        self.resolver.gateway()
    }
}

// A cache that cannot be opened is not fatal; every lookup goes upstream.
async fn open_gateway(path: &Path) -> CacheGateway {
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            warn!(path = %parent.display(), error = %e, "cannot create cache directory, caching disabled");
            return CacheGateway::disabled();
        }
    }
    match SqliteStore::open(path).await {
        Ok(store) => CacheGateway::new(Arc::new(store)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot open cache database, caching disabled");
            CacheGateway::disabled()
        }
    }
}
