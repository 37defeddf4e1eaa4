//! Process-wide services shared by every handler.

use std::sync::Arc;

use folio_auth::Hs256Tokens;
use folio_content::Website;
use folio_core::AccountId;
use folio_infra::store::schema;
use folio_infra::{AppConfig, Database, Repositories, RevalidationWorker, Revalidator, StoreResult, TtlCache};

/// Built once at startup and injected into handlers as an extension.
pub struct AppServices {
    pub repos: Repositories,
    pub tokens: Hs256Tokens,
    /// Cache-aside store for the public website list.
    pub website_cache: Arc<TtlCache<Vec<Website>>>,
    pub revalidator: Revalidator,
    /// The account every content record is attributed to.
    pub owner: AccountId,
    /// Origins allowed by the CORS layer.
    pub frontend_origins: Vec<String>,
    /// Origin echoed by the login route.
    pub login_origin: Option<String>,
}

impl AppServices {
    /// Wire services around already-built repositories.
    ///
    /// Spawns the cache sweeper and the revalidation worker, so this must run
    /// inside a tokio runtime. The sweeper stops once the services are dropped;
    /// the worker stops once its queue drains after that.
    pub fn new(config: &AppConfig, repos: Repositories) -> (Self, RevalidationWorker) {
        let website_cache = Arc::new(TtlCache::new(config.cache_ttl));
        drop(website_cache.spawn_sweeper(config.cache_sweep_interval));

        let (revalidator, worker) = Revalidator::spawn(
            config.revalidation.clone(),
            reqwest::Client::new(),
            config.revalidation_queue,
        );

        let services = Self {
            repos,
            tokens: Hs256Tokens::new(config.jwt_secret.as_bytes()),
            website_cache,
            revalidator,
            owner: config.owner_account,
            frontend_origins: config.frontend_origins.clone(),
            login_origin: config.primary_origin().map(str::to_owned),
        };
        (services, worker)
    }

    /// Open the configured database, bring its schema up to date and wire
    /// SQLite-backed services.
    pub async fn connect(config: &AppConfig) -> StoreResult<(Self, RevalidationWorker)> {
        let db = Database::connect(&config.database_url).await?;
        schema::bootstrap(&db).await?;

        let repos = Repositories::sqlite(&db);
        if !repos.users.exists(config.owner_account).await? {
            tracing::warn!(
                owner = %config.owner_account,
                "owner account not found; create it before logging in"
            );
        }

        Ok(Self::new(config, repos))
    }
}
