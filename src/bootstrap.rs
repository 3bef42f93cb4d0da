//! Adapter selection and server startup.

use crate::catalog::adapters::memory::{InMemoryInventory, InMemoryProductRepository};
use crate::catalog::adapters::postgres::{PostgresInventoryLookup, PostgresProductRepository};
use crate::catalog::ports::{InventoryLookup, ProductRepository};
use crate::config::{AppConfig, MediaBackend};
use crate::http::state::{AppState, Collaborators};
use crate::http::{cors_layer, router};
use crate::identity::adapters::jwt::JwtIdentityProvider;
use crate::identity::adapters::memory::InMemoryUserDirectory;
use crate::identity::adapters::postgres::PostgresUserDirectory;
use crate::identity::ports::UserDirectory;
use crate::issue::adapters::memory::InMemoryIssueRepository;
use crate::issue::adapters::postgres::PostgresIssueRepository;
use crate::issue::ports::IssueRepository;
use crate::media::adapters::cloudinary::CloudinaryMediaStore;
use crate::media::adapters::local::LocalMediaStore;
use crate::media::ports::{MediaStore, MediaStoreError};
use crate::notification::adapters::disabled::DisabledNotifier;
use crate::notification::adapters::sms_gateway::SmsGatewayNotifier;
use crate::notification::ports::Notifier;
use crate::persistence::{self, PgPool};
use axum::http::header::InvalidHeaderValue;
use diesel::r2d2::PoolError;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// URL prefix under which local uploads are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Errors raised while assembling or running the server.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The database pool could not be created.
    #[error("database connection failed: {0}")]
    Database(#[from] PoolError),

    /// The media store could not be initialised.
    #[error("media store setup failed: {0}")]
    Media(#[from] MediaStoreError),

    /// Notification templates failed to load.
    #[error("template setup failed: {0}")]
    Templates(#[from] minijinja::Error),

    /// `CORS_ORIGIN` is not a valid header value.
    #[error("invalid CORS origin: {0}")]
    Cors(#[from] InvalidHeaderValue),

    /// An outbound HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Binding or serving failed.
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking setup task was cancelled or panicked.
    #[error("setup task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

struct Persistence {
    issues: Arc<dyn IssueRepository>,
    products: Arc<dyn ProductRepository>,
    inventory: Arc<dyn InventoryLookup>,
    directory: Arc<dyn UserDirectory>,
}

impl Persistence {
    fn in_memory() -> Self {
        Self {
            issues: Arc::new(InMemoryIssueRepository::new()),
            products: Arc::new(InMemoryProductRepository::new()),
            inventory: Arc::new(InMemoryInventory::new()),
            directory: Arc::new(InMemoryUserDirectory::new()),
        }
    }

    fn postgres(pool: &PgPool) -> Self {
        Self {
            issues: Arc::new(PostgresIssueRepository::new(pool.clone())),
            products: Arc::new(PostgresProductRepository::new(pool.clone())),
            inventory: Arc::new(PostgresInventoryLookup::new(pool.clone())),
            directory: Arc::new(PostgresUserDirectory::new(pool.clone())),
        }
    }
}

async fn persistence_for(config: &AppConfig) -> Result<Persistence, BootstrapError> {
    let Some(url) = config.database_url.clone() else {
        warn!("DATABASE_URL not set, using in-memory storage");
        return Ok(Persistence::in_memory());
    };
    let pool_size = config.pool_size;
    let pool = tokio::task::spawn_blocking(move || persistence::connect(&url, pool_size)).await??;
    info!(pool_size, "connected to PostgreSQL");
    Ok(Persistence::postgres(&pool))
}

fn notifier_for(config: &AppConfig) -> Result<Arc<dyn Notifier>, BootstrapError> {
    let Some(sms) = config.sms.clone() else {
        warn!("SMS gateway not configured, notifications disabled");
        return Ok(Arc::new(DisabledNotifier));
    };
    Ok(Arc::new(SmsGatewayNotifier::new(sms)?))
}

/// Builds the application state from configuration.
///
/// # Errors
///
/// Returns [`BootstrapError`] when a collaborator cannot be set up.
pub async fn build_state(config: &AppConfig) -> Result<AppState, BootstrapError> {
    let Persistence {
        issues,
        products,
        inventory,
        directory,
    } = persistence_for(config).await?;

    let (media, local_media): (Arc<dyn MediaStore>, Option<Arc<LocalMediaStore>>) =
        match &config.media {
            MediaBackend::Cloudinary(credentials) => {
                info!(cloud = %credentials.cloud_name, "storing images on Cloudinary");
                (
                    Arc::new(CloudinaryMediaStore::new(credentials.clone())?),
                    None,
                )
            }
            MediaBackend::Local(root) => {
                info!(%root, "storing images on the local filesystem");
                let store = Arc::new(LocalMediaStore::open(root, UPLOADS_PREFIX)?);
                (Arc::clone(&store) as Arc<dyn MediaStore>, Some(store))
            }
        };

    let mut state = AppState::new(Collaborators {
        issues,
        products,
        inventory,
        media,
        notifier: notifier_for(config)?,
        directory,
        identity: Arc::new(JwtIdentityProvider::new(config.jwt.clone())),
    })?
    .with_max_upload_bytes(config.max_upload_bytes);

    state.local_media = local_media;
    Ok(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

/// Builds the state and serves HTTP until interrupted.
///
/// # Errors
///
/// Returns [`BootstrapError`] when setup, binding or serving fails.
pub async fn serve(config: AppConfig) -> Result<(), BootstrapError> {
    let state = build_state(&config).await?;
    let app = router(state, cors_layer(config.cors_origin.as_deref())?);
    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(address).await?;
    info!(%address, "servicedesk listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
