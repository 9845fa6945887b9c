use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;
use village_jobs::config::AppConfig;
use village_jobs::error::AppError;
use village_jobs::marketplace::{EngineError, LifecycleEngine, MemoryStore};
use village_jobs::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{seed_marketplace, AppState};
use crate::routes::with_marketplace_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryStore::default());
    if args.seed {
        seed_marketplace(&store).map_err(EngineError::from)?;
        info!("sample marketplace catalog loaded");
    }
    let engine = Arc::new(LifecycleEngine::new(store.clone(), store));

    let app = with_marketplace_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "village jobs marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}
