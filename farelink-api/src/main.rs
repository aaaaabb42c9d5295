use std::net::SocketAddr;
use std::sync::Arc;

use farelink_api::{app, AppState};
use farelink_core::{FlightBackend, FlightService};
use farelink_provider::{ProviderClient, ProviderConfig, RemoteProviderBackend};
use farelink_store::app_config::{BackendMode, Config};
use farelink_store::{DbClient, StoreBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farelink_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Farelink API on port {}", config.server.port);

    let backend: Arc<dyn FlightBackend> = match config.backend.mode {
        BackendMode::Local => {
            tracing::info!("Using local store backend at {}", config.database.url);
            let db = DbClient::new(&config.database.url)
                .await
                .expect("Failed to open database");
            db.init_schema().await.expect("Failed to initialize schema");
            if config.database.seed {
                farelink_store::seed::seed_demo_data(&db.pool)
                    .await
                    .expect("Failed to seed demo data");
            }
            Arc::new(StoreBackend::new(db.pool.clone()))
        }
        BackendMode::Remote => {
            tracing::info!("Using remote provider backend at {}", config.provider.base_url);
            let client = ProviderClient::new(ProviderConfig {
                base_url: config.provider.base_url.clone(),
                client_id: config.provider.client_id.clone(),
                client_secret: config.provider.client_secret.clone(),
            })
            .expect("Failed to build provider client");
            Arc::new(RemoteProviderBackend::new(client))
        }
    };

    let state = AppState {
        service: Arc::new(FlightService::new(backend)),
    };
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
